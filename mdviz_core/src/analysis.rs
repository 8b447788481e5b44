use std::fmt;
use std::ops::AddAssign;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::Detection;
use crate::Dialect;
use crate::detect;
use crate::patterns;
use crate::patterns::Segment;

/// Limits above which a document is flagged in the performance report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
	/// Visualizations per document before suggesting pagination or lazy
	/// loading.
	pub max_visualizations: usize,
	/// Document size in kilobytes before suggesting a split.
	pub max_file_size_kb: f64,
	/// Visualizations per document before it counts as a heavy file in the
	/// project-wide suggestions.
	pub heavy_file_visualizations: usize,
}

impl Default for Thresholds {
	fn default() -> Self {
		Self {
			max_visualizations: 10,
			max_file_size_kb: 100.0,
			heavy_file_visualizations: 5,
		}
	}
}

/// Visualizations per library, fenced and inline combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizationTypes {
	pub mermaid: usize,
	pub echarts: usize,
	pub chartjs: usize,
	pub plotly: usize,
	pub d3: usize,
	pub three: usize,
}

impl VisualizationTypes {
	pub fn from_detection(detection: &Detection) -> Self {
		Self {
			mermaid: detection.fenced.mermaid,
			echarts: detection.occurrences(Dialect::Echarts),
			chartjs: detection.occurrences(Dialect::Chartjs),
			plotly: detection.occurrences(Dialect::Plotly),
			d3: detection.d3,
			three: detection.three,
		}
	}

	/// `(name, count)` pairs in report order.
	pub fn entries(&self) -> [(&'static str, usize); 6] {
		[
			("mermaid", self.mermaid),
			("echarts", self.echarts),
			("chartjs", self.chartjs),
			("plotly", self.plotly),
			("d3", self.d3),
			("three", self.three),
		]
	}

	pub fn total(&self) -> usize {
		self.entries().iter().map(|(_, count)| count).sum()
	}
}

impl AddAssign for VisualizationTypes {
	fn add_assign(&mut self, rhs: Self) {
		self.mermaid += rhs.mermaid;
		self.echarts += rhs.echarts;
		self.chartjs += rhs.chartjs;
		self.plotly += rhs.plotly;
		self.d3 += rhs.d3;
		self.three += rhs.three;
	}
}

/// A performance concern found in a single document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum PerformanceIssue {
	TooManyVisualizations { count: usize },
	FileTooLarge { size_kb: f64 },
	/// Plotly containers are embedded without any plotly fence to migrate.
	InlinePlotly,
	D3Usage,
	ThreeUsage,
}

impl fmt::Display for PerformanceIssue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::TooManyVisualizations { count } => {
				write!(
					f,
					"too many visualizations ({count}), consider pagination or lazy loading"
				)
			}
			Self::FileTooLarge { size_kb } => {
				write!(f, "file is too large ({size_kb:.1}KB), consider splitting it")
			}
			Self::InlinePlotly => f.write_str("inline Plotly detected, load it on demand"),
			Self::D3Usage => f.write_str("D3.js detected, make sure it is loaded on demand"),
			Self::ThreeUsage => f.write_str("Three.js detected, make sure it is loaded on demand"),
		}
	}
}

/// Performance facts about one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileAnalysis {
	pub file: String,
	/// Character count divided by 1024.
	pub size_kb: f64,
	pub visualization_count: usize,
	pub types: VisualizationTypes,
	pub complexity: u32,
	pub issues: Vec<PerformanceIssue>,
}

/// Analyze a single document for the performance report.
pub fn analyze_document(file: &str, text: &str, thresholds: &Thresholds) -> FileAnalysis {
	let detection = detect(text);
	let types = VisualizationTypes::from_detection(&detection);
	let visualization_count = types.total();
	let size_kb = text.chars().count() as f64 / 1024.0;
	let mut issues = Vec::new();

	if visualization_count > thresholds.max_visualizations {
		issues.push(PerformanceIssue::TooManyVisualizations {
			count: visualization_count,
		});
	}

	if size_kb > thresholds.max_file_size_kb {
		issues.push(PerformanceIssue::FileTooLarge { size_kb });
	}

	if detection.inline.plotly > 0 && detection.fenced.plotly == 0 {
		issues.push(PerformanceIssue::InlinePlotly);
	}

	if detection.d3 > 0 {
		issues.push(PerformanceIssue::D3Usage);
	}

	if detection.three > 0 {
		issues.push(PerformanceIssue::ThreeUsage);
	}

	FileAnalysis {
		file: file.to_string(),
		size_kb,
		visualization_count,
		types,
		complexity: complexity_score(text),
		issues,
	}
}

/// Score how expensive the `ECharts` content of a document is to render.
///
/// Fenced options score 2 for more than three series and 1 when animation
/// is enabled. Inline `data-option` payloads score 2 for more than three
/// series. Payloads that fail to parse score nothing.
pub fn complexity_score(text: &str) -> u32 {
	let mut score = 0;

	for segment in patterns::segments(text) {
		match segment {
			Segment::Fence(fence) => {
				if fence.dialect() != Some(Dialect::Echarts) {
					continue;
				}
				let Some(Value::Object(option)) = fence
					.payload
					.and_then(|payload| serde_json::from_str::<Value>(payload).ok())
				else {
					continue;
				};

				if has_many_series(&option) {
					score += 2;
				}
				if option.get("animation").is_some_and(is_truthy) {
					score += 1;
				}
			}
			Segment::Prose(prose) => {
				for div in patterns::opening_divs(prose) {
					let Some(raw) = div.attribute("data-option").and_then(|a| a.value) else {
						continue;
					};
					let decoded = patterns::unescape_attribute(raw);
					let Ok(Value::Object(option)) = serde_json::from_str::<Value>(&decoded) else {
						continue;
					};

					if has_many_series(&option) {
						score += 2;
					}
				}
			}
		}
	}

	score
}

fn has_many_series(option: &serde_json::Map<String, Value>) -> bool {
	option
		.get("series")
		.and_then(json_len)
		.is_some_and(|len| len > 3)
}

fn json_len(value: &Value) -> Option<usize> {
	match value {
		Value::Array(items) => Some(items.len()),
		Value::Object(fields) => Some(fields.len()),
		Value::String(text) => Some(text.chars().count()),
		_ => None,
	}
}

fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(flag) => *flag,
		Value::Number(number) => number.as_f64().is_some_and(|n| n.abs() > 0.0),
		Value::String(text) => !text.is_empty(),
		Value::Array(items) => !items.is_empty(),
		Value::Object(fields) => !fields.is_empty(),
	}
}
