use std::fmt;
use std::ops::AddAssign;

use serde::Deserialize;
use serde::Serialize;

/// Class appended to every chart container so that a single stylesheet and
/// loader can target all of them.
pub const MARKER_CLASS: &str = "visualization-container";

/// A visualization payload format recognized inside markdown posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
	/// Mermaid diagrams. The payload is opaque text and only ever
	/// normalized, never converted.
	Mermaid,
	/// `ECharts` options, embedded verbatim as `data-option`.
	Echarts,
	/// Chart.js configurations, embedded verbatim as `data-config` with the
	/// chart type lifted into `data-type`.
	Chartjs,
	/// Plotly figures, split into re-encoded `data` and `layout` attributes.
	Plotly,
}

impl Dialect {
	pub const ALL: [Dialect; 4] = [
		Dialect::Mermaid,
		Dialect::Echarts,
		Dialect::Chartjs,
		Dialect::Plotly,
	];

	/// Chart dialects, the ones with an inline container form.
	pub const CHARTS: [Dialect; 3] = [Dialect::Echarts, Dialect::Chartjs, Dialect::Plotly];

	/// The fence info string that introduces a block of this dialect.
	pub fn tag(self) -> &'static str {
		match self {
			Self::Mermaid => "mermaid",
			Self::Echarts => "echarts",
			Self::Chartjs => "chartjs",
			Self::Plotly => "plotly",
		}
	}

	/// Resolve a fence info string to a dialect. Only exact tags match.
	pub fn from_tag(tag: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|dialect| dialect.tag() == tag)
	}

	/// The class identifying an inline container of this dialect. Mermaid
	/// diagrams have no inline form.
	pub fn container_class(self) -> Option<&'static str> {
		match self {
			Self::Mermaid => None,
			Self::Echarts => Some("echarts-container"),
			Self::Chartjs => Some("chartjs-container"),
			Self::Plotly => Some("plotly-chart"),
		}
	}

	/// Human-readable library name.
	pub fn label(self) -> &'static str {
		match self {
			Self::Mermaid => "Mermaid",
			Self::Echarts => "ECharts",
			Self::Chartjs => "Chart.js",
			Self::Plotly => "Plotly",
		}
	}
}

impl fmt::Display for Dialect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.tag())
	}
}

/// Libraries that only ever appear as inline containers. They are counted
/// for the performance report but never rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InlineLibrary {
	D3,
	Three,
}

impl InlineLibrary {
	pub const ALL: [InlineLibrary; 2] = [InlineLibrary::D3, InlineLibrary::Three];

	pub fn container_class(self) -> &'static str {
		match self {
			Self::D3 => "d3-chart",
			Self::Three => "three-js-container",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::D3 => "D3.js",
			Self::Three => "Three.js",
		}
	}
}

/// Occurrence count per dialect.
///
/// Every detection or rewrite produces a fresh value; callers sum them with
/// `+=` when aggregating across documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectCounts {
	pub mermaid: usize,
	pub echarts: usize,
	pub chartjs: usize,
	pub plotly: usize,
}

impl DialectCounts {
	pub fn get(&self, dialect: Dialect) -> usize {
		match dialect {
			Dialect::Mermaid => self.mermaid,
			Dialect::Echarts => self.echarts,
			Dialect::Chartjs => self.chartjs,
			Dialect::Plotly => self.plotly,
		}
	}

	pub fn increment(&mut self, dialect: Dialect) {
		*self.slot(dialect) += 1;
	}

	pub fn total(&self) -> usize {
		self.mermaid + self.echarts + self.chartjs + self.plotly
	}

	pub fn is_empty(&self) -> bool {
		self.total() == 0
	}

	fn slot(&mut self, dialect: Dialect) -> &mut usize {
		match dialect {
			Dialect::Mermaid => &mut self.mermaid,
			Dialect::Echarts => &mut self.echarts,
			Dialect::Chartjs => &mut self.chartjs,
			Dialect::Plotly => &mut self.plotly,
		}
	}
}

impl AddAssign for DialectCounts {
	fn add_assign(&mut self, rhs: Self) {
		for dialect in Dialect::ALL {
			*self.slot(dialect) += rhs.get(dialect);
		}
	}
}
