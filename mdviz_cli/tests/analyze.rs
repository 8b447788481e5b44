mod common;

use mdviz_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;

const PLOTLY_POST: &str = "```plotly\n{\"data\": [], \"layout\": {}}\n```\n\n<div class=\"d3-chart\"></div>\n";

#[test]
fn analyze_prints_summary_and_exports_report() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_post(tmp.path(), "chart.md", common::CHART_POST)?;
	common::write_post(tmp.path(), "plotly.md", PLOTLY_POST)?;
	common::write_post(tmp.path(), "plain.md", common::PLAIN_POST)?;

	common::mdviz_cmd()
		.arg("analyze")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Files analyzed"))
		.stdout(predicates::str::contains("good ("))
		.stdout(predicates::str::contains("Plotly detected"))
		.stdout(predicates::str::contains("D3.js detected"))
		.stdout(predicates::str::contains("Report written to performance_report.json"));

	let report: Value = serde_json::from_str(&std::fs::read_to_string(
		tmp.path().join("performance_report.json"),
	)?)?;
	assert_eq!(report["total_files"], 3);
	assert_eq!(report["files_with_visualizations"], 2);
	assert_eq!(report["visualization_types"]["echarts"], 1);
	assert_eq!(report["visualization_types"]["plotly"], 1);
	assert_eq!(report["visualization_types"]["d3"], 1);
	assert_eq!(report["rating"], "good");

	Ok(())
}

#[test]
fn analyze_json_format_prints_report() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_post(tmp.path(), "chart.md", common::CHART_POST)?;

	let output = common::mdviz_cmd()
		.arg("analyze")
		.arg("--format")
		.arg("json")
		.arg("--no-export")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let report: Value = serde_json::from_slice(&output)?;
	assert_eq!(report["total_files"], 1);
	assert_eq!(report["file_details"][0]["file"], "chart.md");
	assert!(!tmp.path().join("performance_report.json").exists());

	Ok(())
}

#[test]
fn analyze_writes_to_custom_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_post(tmp.path(), "chart.md", common::CHART_POST)?;

	common::mdviz_cmd()
		.arg("analyze")
		.arg("--output")
		.arg("reports/perf.json")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Report written to reports/perf.json"));

	assert!(tmp.path().join("reports/perf.json").is_file());
	assert!(!tmp.path().join("performance_report.json").exists());

	Ok(())
}

#[test]
fn analyze_uses_configured_thresholds() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("mdviz.toml"),
		"[report]\noutput = \"out/report.json\"\nmax_visualizations = 1\n",
	)?;
	common::write_post(
		tmp.path(),
		"diagrams.md",
		"```mermaid\ngraph TD\n```\n\n```mermaid\ngraph LR\n```\n",
	)?;

	common::mdviz_cmd()
		.arg("analyze")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Files with issues"))
		.stdout(predicates::str::contains("too many visualizations (2)"));

	let report: Value = serde_json::from_str(&std::fs::read_to_string(
		tmp.path().join("out/report.json"),
	)?)?;
	assert_eq!(
		report["file_details"][0]["issues"][0]["kind"],
		"too_many_visualizations"
	);

	Ok(())
}

#[test]
fn analyze_without_visualizations_is_excellent() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_post(tmp.path(), "plain.md", common::PLAIN_POST)?;

	common::mdviz_cmd()
		.arg("analyze")
		.arg("--no-export")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("excellent"))
		.stdout(predicates::str::contains("Suggestions").not());

	Ok(())
}
