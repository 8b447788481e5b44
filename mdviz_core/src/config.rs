use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::MdvizError;
use crate::MdvizResult;
use crate::Thresholds;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["mdviz.toml", ".mdviz.toml", ".config/mdviz.toml"];

/// Directory holding the posts when none is configured.
pub const DEFAULT_POSTS_DIR: &str = "_posts";

/// Where the performance report is exported when none is configured.
pub const DEFAULT_REPORT_FILE: &str = "performance_report.json";

/// Configuration loaded from an `mdviz.toml` file.
///
/// ```toml
/// posts_dir = "_posts"
/// extensions = ["md", "markdown"]
///
/// [exclude]
/// patterns = ["drafts/", "*.draft.md"]
///
/// [report]
/// output = "performance_report.json"
/// max_visualizations = 10
/// max_file_size_kb = 100.0
/// heavy_file_visualizations = 5
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct MdvizConfig {
	/// Directory containing the posts, relative to the project root.
	#[serde(default = "default_posts_dir")]
	pub posts_dir: PathBuf,
	/// File extensions (without the dot) treated as posts.
	#[serde(default = "default_extensions")]
	pub extensions: Vec<String>,
	/// Exclusion configuration using gitignore-style patterns.
	#[serde(default)]
	pub exclude: ExcludeConfig,
	/// Performance report settings.
	#[serde(default)]
	pub report: ReportConfig,
}

impl Default for MdvizConfig {
	fn default() -> Self {
		Self {
			posts_dir: default_posts_dir(),
			extensions: default_extensions(),
			exclude: ExcludeConfig::default(),
			report: ReportConfig::default(),
		}
	}
}

/// Configuration for excluding posts from processing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeConfig {
	/// Gitignore-style patterns matched against paths inside the posts
	/// directory.
	#[serde(default)]
	pub patterns: Vec<String>,
}

/// Configuration for the performance report.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
	/// Report destination, relative to the project root.
	pub output: PathBuf,
	pub max_visualizations: usize,
	pub max_file_size_kb: f64,
	pub heavy_file_visualizations: usize,
}

impl Default for ReportConfig {
	fn default() -> Self {
		let thresholds = Thresholds::default();
		Self {
			output: PathBuf::from(DEFAULT_REPORT_FILE),
			max_visualizations: thresholds.max_visualizations,
			max_file_size_kb: thresholds.max_file_size_kb,
			heavy_file_visualizations: thresholds.heavy_file_visualizations,
		}
	}
}

impl ReportConfig {
	pub fn thresholds(&self) -> Thresholds {
		Thresholds {
			max_visualizations: self.max_visualizations,
			max_file_size_kb: self.max_file_size_kb,
			heavy_file_visualizations: self.heavy_file_visualizations,
		}
	}
}

fn default_posts_dir() -> PathBuf {
	PathBuf::from(DEFAULT_POSTS_DIR)
}

fn default_extensions() -> Vec<String> {
	vec!["md".to_string()]
}

impl MdvizConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> MdvizResult<Option<MdvizConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		tracing::debug!(path = %config_path.display(), "loading config");

		Self::parse(&content).map(Some)
	}

	pub fn parse(content: &str) -> MdvizResult<MdvizConfig> {
		toml::from_str(content).map_err(|e| MdvizError::ConfigParse(e.to_string()))
	}
}
