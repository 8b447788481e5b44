use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::Detection;
use crate::Dialect;
use crate::DialectCounts;
use crate::FileAnalysis;
use crate::InlineLibrary;
use crate::MdvizError;
use crate::MdvizResult;
use crate::Rewrite;
use crate::Thresholds;
use crate::VisualizationTypes;

/// A document that could not be read or written. The rest of the batch is
/// still processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
	pub file: PathBuf,
	pub message: String,
}

/// Running totals for a migration over many documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationSummary {
	pub processed_files: usize,
	/// Documents whose text changed.
	pub updated_files: usize,
	/// Fenced blocks found before rewriting.
	pub blocks: DialectCounts,
	/// Fenced chart blocks replaced by inline containers.
	pub converted: DialectCounts,
	pub normalized_containers: usize,
	pub invalid_payloads: usize,
	pub failures: Vec<FileFailure>,
}

impl MigrationSummary {
	pub fn record(&mut self, detection: &Detection, rewrite: &Rewrite) {
		self.processed_files += 1;
		self.blocks += detection.fenced;
		self.converted += rewrite.converted;
		self.normalized_containers += rewrite.normalized;
		self.invalid_payloads += rewrite.diagnostics.len();
		if rewrite.changed {
			self.updated_files += 1;
		}
	}

	pub fn record_failure(&mut self, failure: FileFailure) {
		self.failures.push(failure);
	}
}

/// Overall verdict on how much visualization a site carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
	#[default]
	Excellent,
	Good,
	Heavy,
	Excessive,
}

impl Rating {
	pub fn from_total(total: usize) -> Self {
		match total {
			0 => Self::Excellent,
			1..=20 => Self::Good,
			21..=50 => Self::Heavy,
			_ => Self::Excessive,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Excellent => "excellent",
			Self::Good => "good",
			Self::Heavy => "heavy",
			Self::Excessive => "excessive",
		}
	}

	pub fn description(self) -> &'static str {
		match self {
			Self::Excellent => "no visualizations, performance is excellent",
			Self::Good => "a moderate number of visualizations, performance is good",
			Self::Heavy => "many visualizations, optimization is recommended",
			Self::Excessive => "too many visualizations, optimize immediately",
		}
	}

	pub fn is_concerning(self) -> bool {
		matches!(self, Self::Heavy | Self::Excessive)
	}
}

/// A project-wide optimization hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Suggestion {
	/// A heavyweight library is in use and should be loaded on demand.
	LazyLoad { library: &'static str },
	/// Documents exceeding the heavy-file threshold.
	HeavyFiles { count: usize },
}

impl fmt::Display for Suggestion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::LazyLoad { library } => {
				write!(f, "{library} detected, enable on-demand loading to improve performance")
			}
			Self::HeavyFiles { count } => {
				write!(
					f,
					"{count} file(s) contain too many visualizations, consider lazy loading"
				)
			}
		}
	}
}

/// Aggregated visualization usage across a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceReport {
	pub total_files: usize,
	pub files_with_visualizations: usize,
	pub visualization_types: VisualizationTypes,
	pub file_details: Vec<FileAnalysis>,
	pub failures: Vec<FileFailure>,
	pub optimization_suggestions: Vec<Suggestion>,
	pub rating: Rating,
}

impl PerformanceReport {
	pub fn record(&mut self, analysis: FileAnalysis) {
		self.total_files += 1;
		if analysis.visualization_count > 0 {
			self.files_with_visualizations += 1;
		}
		self.visualization_types += analysis.types;
		self.file_details.push(analysis);
	}

	pub fn record_failure(&mut self, failure: FileFailure) {
		self.total_files += 1;
		self.failures.push(failure);
	}

	/// Derive suggestions and the rating from everything recorded so far.
	pub fn finish(&mut self, thresholds: &Thresholds) {
		let types = &self.visualization_types;
		let mut suggestions = Vec::new();

		if types.plotly > 0 {
			suggestions.push(Suggestion::LazyLoad {
				library: Dialect::Plotly.label(),
			});
		}
		if types.d3 > 0 {
			suggestions.push(Suggestion::LazyLoad {
				library: InlineLibrary::D3.label(),
			});
		}
		if types.three > 0 {
			suggestions.push(Suggestion::LazyLoad {
				library: InlineLibrary::Three.label(),
			});
		}

		let heavy_files = self
			.file_details
			.iter()
			.filter(|file| file.visualization_count > thresholds.heavy_file_visualizations)
			.count();
		if heavy_files > 0 {
			suggestions.push(Suggestion::HeavyFiles { count: heavy_files });
		}

		self.optimization_suggestions = suggestions;
		self.rating = Rating::from_total(self.visualization_types.total());
	}

	pub fn to_json(&self) -> MdvizResult<String> {
		serde_json::to_string_pretty(self).map_err(|e| MdvizError::ReportSerialize(e.to_string()))
	}
}
