//! `mdviz_core` finds visualization blocks embedded in markdown posts,
//! converts chart code fences into inline HTML containers, and reports how
//! heavily each post relies on client-side visualization libraries.
//!
//! ## Dialects
//!
//! | Fence tag | Inline container class | Rewrite                                   |
//! | --------- | ---------------------- | ----------------------------------------- |
//! | `mermaid` | none                   | fence normalized, payload trimmed         |
//! | `echarts` | `echarts-container`    | raw payload in `data-option`              |
//! | `chartjs` | `chartjs-container`    | raw payload in `data-config`, `data-type` |
//! | `plotly`  | `plotly-chart`         | re-encoded `data` and `layout` attributes |
//!
//! Every chart container also carries the shared
//! [`MARKER_CLASS`] (`visualization-container`).
//!
//! ## Processing Pipeline
//!
//! ```text
//! Markdown post
//!   → Patterns (split into fenced blocks and prose, find opening <div> tags)
//!   → Detector (count fenced and inline occurrences per dialect)
//!   → Rewriter (convert chart fences, normalize mermaid, mark containers)
//!   → Accumulators (MigrationSummary, PerformanceReport)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: configuration loading from `mdviz.toml`.
//! - [`project`]: document discovery, migration planning and writing,
//!   project analysis, and report export.
//!
//! ## Quick Start
//!
//! ```rust
//! use mdviz_core::detect;
//! use mdviz_core::rewrite;
//!
//! let post = "# Sales\n\n```echarts\n{\"series\": []}\n```\n";
//!
//! let detection = detect(post);
//! assert_eq!(detection.fenced.echarts, 1);
//!
//! let result = rewrite(post);
//! assert!(result.changed);
//! assert!(result.text.contains("data-option='{\"series\": []}'"));
//!
//! // Rewriting is idempotent.
//! assert!(!rewrite(&result.text).changed);
//! ```

pub use analysis::*;
pub use config::*;
pub use detect::*;
pub use dialect::*;
pub use error::*;
pub use project::*;
pub use report::*;
pub use rewrite::*;

mod analysis;
pub mod config;
mod detect;
mod dialect;
#[allow(unused_assignments)]
mod error;
pub(crate) mod patterns;
pub mod project;
mod report;
mod rewrite;

#[cfg(test)]
mod __fixtures;
