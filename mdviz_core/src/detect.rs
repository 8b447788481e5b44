use serde::Serialize;

use crate::Dialect;
use crate::DialectCounts;
use crate::InlineLibrary;
use crate::patterns;
use crate::patterns::Segment;

/// Visualization occurrences found in a single document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Detection {
	/// Fenced blocks per dialect.
	pub fenced: DialectCounts,
	/// Inline containers per dialect. `mermaid` is always zero.
	pub inline: DialectCounts,
	/// Inline `d3-chart` containers.
	pub d3: usize,
	/// Inline `three-js-container` containers.
	pub three: usize,
}

impl Detection {
	pub fn inline_library(&self, library: InlineLibrary) -> usize {
		match library {
			InlineLibrary::D3 => self.d3,
			InlineLibrary::Three => self.three,
		}
	}

	/// Fenced and inline occurrences of a dialect combined.
	pub fn occurrences(&self, dialect: Dialect) -> usize {
		self.fenced.get(dialect) + self.inline.get(dialect)
	}

	pub fn total(&self) -> usize {
		self.fenced.total() + self.inline.total() + self.d3 + self.three
	}
}

/// Count every visualization block in `text`.
///
/// This is a pure scan: it never fails and absence of matches yields zero
/// counts.
pub fn detect(text: &str) -> Detection {
	let mut detection = Detection::default();

	for segment in patterns::segments(text) {
		match segment {
			Segment::Fence(fence) => {
				if let Some(dialect) = fence.dialect() {
					detection.fenced.increment(dialect);
				}
			}
			Segment::Prose(prose) => {
				for div in patterns::opening_divs(prose) {
					for dialect in Dialect::CHARTS {
						if dialect
							.container_class()
							.is_some_and(|class| div.has_class(class))
						{
							detection.inline.increment(dialect);
						}
					}

					if div.has_class(InlineLibrary::D3.container_class()) {
						detection.d3 += 1;
					}
					if div.has_class(InlineLibrary::Three.container_class()) {
						detection.three += 1;
					}
				}
			}
		}
	}

	detection
}
