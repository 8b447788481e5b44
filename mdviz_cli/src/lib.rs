use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Migrate chart and diagram blocks in markdown posts to inline containers.",
	long_about = "mdviz finds mermaid, ECharts, Chart.js, and Plotly blocks in a directory of \
	              markdown posts.\n\nChart code fences are converted into inline HTML containers \
	              that a page script can render, mermaid fences are normalized, and existing \
	              containers are tagged with a shared marker class.\n\nQuick start:\n  mdviz \
	              migrate   Rewrite the posts in place\n  mdviz check     Verify every post is \
	              already migrated\n  mdviz analyze   Report visualization usage per post"
)]
pub struct MdvizCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Directory containing the posts, relative to the project root.
	/// Overrides `posts_dir` from `mdviz.toml`.
	#[arg(long, global = true)]
	pub posts_dir: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Convert visualization blocks in every post.
	///
	/// ECharts, Chart.js, and Plotly code fences are replaced with inline
	/// containers carrying their configuration in data attributes. Mermaid
	/// fences are normalized and existing chart containers receive the
	/// `visualization-container` class. Blocks with malformed JSON are
	/// reported and left untouched.
	Migrate {
		/// Preview changes without writing files.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Show a unified diff for each post that changes.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
	/// Check that every post is already migrated.
	///
	/// Exits with a non-zero status code if running `mdviz migrate` would
	/// change any post. Ideal for CI pipelines.
	Check {
		/// Show a unified diff for each post that would change.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
	/// Analyze visualization usage and export a performance report.
	///
	/// Counts visualizations per library in every post, scores `ECharts`
	/// complexity, flags heavy posts, and suggests optimizations. The report
	/// is written as JSON to the configured output unless `--no-export` is
	/// passed.
	Analyze {
		/// Output format for the summary printed to stdout.
		#[arg(long, value_enum, default_value_t = AnalyzeOutputFormat::Text)]
		format: AnalyzeOutputFormat,

		/// Where to write the JSON report, relative to the project root.
		/// Overrides `[report] output` from `mdviz.toml`.
		#[arg(long, short)]
		output: Option<PathBuf>,

		/// Skip writing the JSON report.
		#[arg(long, default_value_t = false)]
		no_export: bool,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AnalyzeOutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// The full report as JSON for programmatic consumption.
	Json,
}
