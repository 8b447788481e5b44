use std::path::Path;

use assert_cmd::Command;
use mdviz_core::AnyEmptyResult;

pub fn mdviz_cmd() -> Command {
	let mut cmd = Command::new(env!("CARGO_BIN_EXE_mdviz"));
	cmd.env("NO_COLOR", "1").env_remove("MDVIZ_LOG");
	cmd
}

/// Write a post into `<root>/_posts`, creating the directory when needed.
pub fn write_post(root: &Path, name: &str, content: &str) -> AnyEmptyResult {
	let posts = root.join("_posts");
	std::fs::create_dir_all(&posts)?;
	std::fs::write(posts.join(name), content)?;
	Ok(())
}

pub const CHART_POST: &str = "# Sales\n\n```echarts\n{\"series\": []}\n```\n";
pub const PLAIN_POST: &str = "# Notes\n\nNothing to draw.\n";
