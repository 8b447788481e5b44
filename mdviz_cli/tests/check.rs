mod common;

use mdviz_core::AnyEmptyResult;

#[test]
fn check_passes_when_migrated() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_post(tmp.path(), "plain.md", common::PLAIN_POST)?;
	common::write_post(
		tmp.path(),
		"chart.md",
		"<div class=\"echarts-container visualization-container\" data-option='{}'></div>\n",
	)?;

	common::mdviz_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Check passed: all 2 post(s) are migrated."));

	Ok(())
}

#[test]
fn check_fails_when_stale() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_post(tmp.path(), "chart.md", common::CHART_POST)?;

	common::mdviz_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("_posts/chart.md"))
		.stderr(predicates::str::contains("Run `mdviz migrate` to fix."));

	let chart = std::fs::read_to_string(tmp.path().join("_posts/chart.md"))?;
	assert_eq!(chart, common::CHART_POST);

	Ok(())
}

#[test]
fn check_shows_diff() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_post(
		tmp.path(),
		"chart.md",
		"<div class=\"chartjs-container\"></div>\n",
	)?;

	common::mdviz_cmd()
		.arg("check")
		.arg("--diff")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains(
			"-<div class=\"chartjs-container\"></div>",
		))
		.stderr(predicates::str::contains(
			"+<div class=\"chartjs-container visualization-container\"></div>",
		));

	Ok(())
}

#[test]
fn check_passes_after_migrate() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_post(tmp.path(), "chart.md", common::CHART_POST)?;
	common::write_post(
		tmp.path(),
		"diagram.md",
		"```mermaid\n\n  graph TD\n  A-->B\n```\n",
	)?;

	common::mdviz_cmd()
		.arg("migrate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	common::mdviz_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	Ok(())
}

#[test]
fn check_ignores_invalid_payloads() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_post(tmp.path(), "broken.md", "```plotly\n[1, 2]\n```\n")?;

	common::mdviz_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains(
			"Plotly configuration must be a JSON object",
		));

	Ok(())
}
