mod common;

use mdviz_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

#[test]
fn migrate_rewrites_changed_posts() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_post(tmp.path(), "chart.md", common::CHART_POST)?;
	common::write_post(tmp.path(), "plain.md", common::PLAIN_POST)?;

	common::mdviz_cmd()
		.arg("migrate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("updated _posts/chart.md"))
		.stdout(predicates::str::contains("Updated 1 of 2 file(s)."))
		.stdout(predicates::str::contains("converted blocks: echarts 1, chartjs 0, plotly 0"))
		.stdout(predicates::str::contains("plain.md").not());

	let chart = std::fs::read_to_string(tmp.path().join("_posts/chart.md"))?;
	assert_eq!(
		chart,
		"# Sales\n\n<div class=\"echarts-container visualization-container\" data-option='{\"series\": []}'></div>\n"
	);
	let plain = std::fs::read_to_string(tmp.path().join("_posts/plain.md"))?;
	assert_eq!(plain, common::PLAIN_POST);

	Ok(())
}

#[test]
fn migrate_twice_is_a_no_op() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_post(tmp.path(), "chart.md", common::CHART_POST)?;

	common::mdviz_cmd()
		.arg("migrate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();
	let first = std::fs::read_to_string(tmp.path().join("_posts/chart.md"))?;

	common::mdviz_cmd()
		.arg("migrate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"All posts are already migrated (1 file(s) scanned).",
		));
	let second = std::fs::read_to_string(tmp.path().join("_posts/chart.md"))?;
	assert_eq!(first, second);

	Ok(())
}

#[test]
fn migrate_dry_run_writes_nothing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_post(tmp.path(), "chart.md", common::CHART_POST)?;

	common::mdviz_cmd()
		.arg("migrate")
		.arg("--dry-run")
		.arg("--diff")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("would update _posts/chart.md"))
		.stdout(predicates::str::contains("-```echarts"))
		.stdout(predicates::str::contains(
			"+<div class=\"echarts-container visualization-container\"",
		))
		.stdout(predicates::str::contains("Dry run: would update 1 of 1 file(s)."));

	let chart = std::fs::read_to_string(tmp.path().join("_posts/chart.md"))?;
	assert_eq!(chart, common::CHART_POST);

	Ok(())
}

#[test]
fn migrate_warns_about_invalid_payloads() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let broken = "# Broken\n\n```echarts\nnot-json\n```\n";
	common::write_post(tmp.path(), "broken.md", broken)?;

	common::mdviz_cmd()
		.arg("migrate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains(
			"warning: _posts/broken.md:3: invalid ECharts JSON configuration",
		))
		.stdout(predicates::str::contains("invalid payloads left unchanged: 1"));

	let content = std::fs::read_to_string(tmp.path().join("_posts/broken.md"))?;
	assert_eq!(content, broken);

	Ok(())
}

#[test]
fn migrate_uses_configured_posts_dir() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("mdviz.toml"), "posts_dir = \"blog\"\n")?;
	std::fs::create_dir_all(tmp.path().join("blog"))?;
	std::fs::write(tmp.path().join("blog/chart.md"), common::CHART_POST)?;
	common::write_post(tmp.path(), "ignored.md", common::CHART_POST)?;

	common::mdviz_cmd()
		.arg("migrate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("updated blog/chart.md"));

	let ignored = std::fs::read_to_string(tmp.path().join("_posts/ignored.md"))?;
	assert_eq!(ignored, common::CHART_POST);

	Ok(())
}

#[test]
fn migrate_posts_dir_flag_overrides_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join("content"))?;
	std::fs::write(tmp.path().join("content/chart.md"), common::CHART_POST)?;

	common::mdviz_cmd()
		.arg("migrate")
		.arg("--posts-dir")
		.arg("content")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("updated content/chart.md"));

	Ok(())
}

#[test]
fn migrate_fails_without_posts_dir() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::mdviz_cmd()
		.arg("migrate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("posts directory not found"));

	Ok(())
}

#[test]
fn migrate_fails_on_invalid_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("mdviz.toml"), "posts_dir = [")?;
	common::write_post(tmp.path(), "chart.md", common::CHART_POST)?;

	common::mdviz_cmd()
		.arg("migrate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to parse config file"));

	let chart = std::fs::read_to_string(tmp.path().join("_posts/chart.md"))?;
	assert_eq!(chart, common::CHART_POST);

	Ok(())
}

#[test]
fn migrate_continues_past_unreadable_posts() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_post(tmp.path(), "chart.md", common::CHART_POST)?;
	std::fs::write(tmp.path().join("_posts/binary.md"), [0xff, 0xfe, 0xfd])?;

	common::mdviz_cmd()
		.arg("migrate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("error: _posts/binary.md"))
		.stderr(predicates::str::contains("1 file(s) could not be processed"));

	let chart = std::fs::read_to_string(tmp.path().join("_posts/chart.md"))?;
	assert!(chart.contains("echarts-container visualization-container"));

	Ok(())
}
