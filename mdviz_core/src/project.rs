use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::Detection;
use crate::FileFailure;
use crate::MdvizConfig;
use crate::MdvizError;
use crate::MdvizResult;
use crate::MigrationSummary;
use crate::PerformanceReport;
use crate::Rewrite;
use crate::Thresholds;
use crate::analyze_document;
use crate::detect;
use crate::rewrite;

/// Options controlling which documents are picked up.
#[derive(Debug, Clone)]
pub struct ScanOptions {
	/// File extensions (without the dot) treated as posts.
	pub extensions: Vec<String>,
	/// Gitignore-style patterns to exclude.
	pub exclude_patterns: Vec<String>,
}

impl Default for ScanOptions {
	fn default() -> Self {
		Self::from_config(None)
	}
}

impl ScanOptions {
	pub fn from_config(config: Option<&MdvizConfig>) -> Self {
		let defaults = MdvizConfig::default();
		let config = config.unwrap_or(&defaults);

		Self {
			extensions: config.extensions.clone(),
			exclude_patterns: config.exclude.patterns.clone(),
		}
	}

	fn accepts_extension(&self, path: &Path) -> bool {
		path.extension()
			.and_then(|ext| ext.to_str())
			.is_some_and(|ext| self.extensions.iter().any(|allowed| allowed == ext))
	}
}

/// A project root together with its resolved configuration.
#[derive(Debug, Clone)]
pub struct ProjectContext {
	pub root: PathBuf,
	/// The config file in use, if one was discovered.
	pub config_path: Option<PathBuf>,
	pub posts_dir: PathBuf,
	pub options: ScanOptions,
	pub thresholds: Thresholds,
	/// Destination of the exported performance report.
	pub report_output: PathBuf,
}

impl ProjectContext {
	/// Point the context at a different posts directory. Relative paths are
	/// resolved against the project root.
	#[must_use]
	pub fn with_posts_dir(mut self, posts_dir: &Path) -> Self {
		self.posts_dir = self.root.join(posts_dir);
		self
	}
}

/// Load the configuration found at `root` and resolve every path against it.
pub fn load_project(root: &Path) -> MdvizResult<ProjectContext> {
	let config_path = MdvizConfig::resolve_path(root);
	let config = MdvizConfig::load(root)?.unwrap_or_default();

	Ok(ProjectContext {
		root: root.to_path_buf(),
		config_path,
		posts_dir: root.join(&config.posts_dir),
		options: ScanOptions::from_config(Some(&config)),
		thresholds: config.report.thresholds(),
		report_output: root.join(&config.report.output),
	})
}

/// List the documents directly inside `posts_dir`, sorted by path.
///
/// Hidden files, files with other extensions, and paths matched by the
/// exclude patterns are skipped.
pub fn collect_documents(posts_dir: &Path, options: &ScanOptions) -> MdvizResult<Vec<PathBuf>> {
	if !posts_dir.is_dir() {
		return Err(MdvizError::PostsDirMissing(posts_dir.display().to_string()));
	}

	let exclude = build_exclude_matcher(posts_dir, &options.exclude_patterns)?;
	let mut documents = Vec::new();

	for entry in std::fs::read_dir(posts_dir)? {
		let path = entry?.path();

		if path
			.file_name()
			.and_then(|name| name.to_str())
			.is_none_or(|name| name.starts_with('.'))
		{
			continue;
		}

		if !path.is_file() || !options.accepts_extension(&path) {
			continue;
		}

		if exclude.matched(&path, false).is_ignore() {
			tracing::debug!(path = %path.display(), "excluded by pattern");
			continue;
		}

		documents.push(path);
	}

	documents.sort();
	Ok(documents)
}

/// Build a `Gitignore` matcher from the configured exclude patterns.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> MdvizResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder
			.add_line(None, pattern)
			.map_err(|e| MdvizError::InvalidExcludePattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			})?;
	}
	builder
		.build()
		.map_err(|e| MdvizError::InvalidExcludePattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		})
}

/// The planned rewrite of a single document.
#[derive(Debug, Clone)]
pub struct DocumentMigration {
	pub path: PathBuf,
	pub original: String,
	/// Visualizations found before rewriting.
	pub detection: Detection,
	pub rewrite: Rewrite,
}

impl DocumentMigration {
	pub fn is_changed(&self) -> bool {
		self.rewrite.changed
	}

	pub fn updated(&self) -> &str {
		&self.rewrite.text
	}
}

/// Result of planning a migration across a project. Nothing is written until
/// [`write_migration`] is called.
#[derive(Debug, Clone, Default)]
pub struct MigrationPlan {
	pub documents: Vec<DocumentMigration>,
	pub summary: MigrationSummary,
}

impl MigrationPlan {
	pub fn changed(&self) -> impl Iterator<Item = &DocumentMigration> {
		self.documents.iter().filter(|document| document.is_changed())
	}

	pub fn is_up_to_date(&self) -> bool {
		self.changed().next().is_none()
	}
}

/// Detect and rewrite a single document held in memory.
pub fn migrate_document(path: &Path, text: String) -> DocumentMigration {
	DocumentMigration {
		path: path.to_path_buf(),
		detection: detect(&text),
		rewrite: rewrite(&text),
		original: text,
	}
}

/// Read, detect, and rewrite every document in the project.
///
/// A document that cannot be read is recorded as a failure and the rest of
/// the batch is still planned.
pub fn plan_migration(ctx: &ProjectContext) -> MdvizResult<MigrationPlan> {
	let mut plan = MigrationPlan::default();

	for path in collect_documents(&ctx.posts_dir, &ctx.options)? {
		tracing::debug!(path = %path.display(), "migrating document");

		let text = match std::fs::read_to_string(&path) {
			Ok(text) => text,
			Err(e) => {
				plan.summary.record_failure(FileFailure {
					file: path,
					message: e.to_string(),
				});
				continue;
			}
		};

		let document = migrate_document(&path, text);
		plan.summary.record(&document.detection, &document.rewrite);
		plan.documents.push(document);
	}

	Ok(plan)
}

/// Write every changed document back in place. Returns the documents that
/// could not be written.
pub fn write_migration(plan: &MigrationPlan) -> Vec<FileFailure> {
	let mut failures = Vec::new();

	for document in plan.changed() {
		if let Err(e) = std::fs::write(&document.path, document.updated()) {
			failures.push(FileFailure {
				file: document.path.clone(),
				message: e.to_string(),
			});
		}
	}

	failures
}

/// Analyze every document in the project and build the performance report.
pub fn analyze_project(ctx: &ProjectContext) -> MdvizResult<PerformanceReport> {
	let mut report = PerformanceReport::default();

	for path in collect_documents(&ctx.posts_dir, &ctx.options)? {
		tracing::debug!(path = %path.display(), "analyzing document");

		match std::fs::read_to_string(&path) {
			Ok(text) => {
				let name = path.file_name().map_or_else(
					|| path.display().to_string(),
					|name| name.to_string_lossy().into_owned(),
				);
				report.record(analyze_document(&name, &text, &ctx.thresholds));
			}
			Err(e) => {
				report.record_failure(FileFailure {
					file: path,
					message: e.to_string(),
				});
			}
		}
	}

	report.finish(&ctx.thresholds);
	Ok(report)
}

/// Export the report as pretty-printed JSON, creating parent directories as
/// needed.
pub fn export_report(report: &PerformanceReport, output: &Path) -> MdvizResult<()> {
	if let Some(parent) = output.parent() {
		if !parent.as_os_str().is_empty() {
			std::fs::create_dir_all(parent)?;
		}
	}

	let mut json = report.to_json()?;
	json.push('\n');
	std::fs::write(output, json)?;
	Ok(())
}
