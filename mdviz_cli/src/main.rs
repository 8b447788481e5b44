use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use mdviz_cli::AnalyzeOutputFormat;
use mdviz_cli::Commands;
use mdviz_cli::MdvizCli;
use mdviz_core::Dialect;
use mdviz_core::FileFailure;
use mdviz_core::MigrationPlan;
use mdviz_core::PerformanceReport;
use mdviz_core::ProjectContext;
use mdviz_core::analyze_project;
use mdviz_core::export_report;
use mdviz_core::load_project;
use mdviz_core::plan_migration;
use mdviz_core::write_migration;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = MdvizCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Migrate { dry_run, diff }) => run_migrate(&args, *dry_run, *diff),
		Some(Commands::Check { diff }) => run_check(&args, *diff),
		Some(Commands::Analyze {
			format,
			output,
			no_export,
		}) => run_analyze(&args, *format, output.as_deref(), *no_export),
		None => {
			eprintln!("No subcommand specified. Run `mdviz --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<mdviz_core::MdvizError>() {
			Ok(mdviz_err) => {
				let report: miette::Report = (*mdviz_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `MDVIZ_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_filter = if verbose { "debug" } else { "error" };
	let filter =
		EnvFilter::try_from_env("MDVIZ_LOG").unwrap_or_else(|_| EnvFilter::new(default_filter));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.try_init()
		.ok();
}

fn resolve_root(args: &MdvizCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn print_section(title: &str) {
	println!();
	println!("{}", colored!(title, bold));
}

fn print_field(label: &str, value: impl std::fmt::Display) {
	println!("{label:<28} {value}");
}

fn load_context(args: &MdvizCli) -> Result<ProjectContext, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let mut ctx = load_project(&root)?;

	if let Some(posts_dir) = &args.posts_dir {
		ctx = ctx.with_posts_dir(posts_dir);
	}

	if args.verbose {
		let config = ctx
			.config_path
			.as_ref()
			.map_or_else(|| "none".to_string(), |path| make_relative(path, &root));
		eprintln!("Config: {config}");
		eprintln!("Posts directory: {}", make_relative(&ctx.posts_dir, &root));
	}

	Ok(ctx)
}

/// Print diagnostics and failures collected while planning a migration.
fn print_plan_warnings(plan: &MigrationPlan, root: &Path) {
	for document in &plan.documents {
		let rel = make_relative(&document.path, root);
		for diagnostic in &document.rewrite.diagnostics {
			eprintln!(
				"{} {rel}:{}: {} (block left unchanged)",
				colored!("warning:", yellow),
				diagnostic.line,
				diagnostic.message
			);
		}
	}

	print_failures(&plan.summary.failures, root);
}

fn print_failures(failures: &[FileFailure], root: &Path) {
	for failure in failures {
		let rel = make_relative(&failure.file, root);
		eprintln!("{} {rel}: {}", colored!("error:", red), failure.message);
	}
}

fn failure_error(count: usize) -> Box<dyn std::error::Error> {
	format!("{count} file(s) could not be processed").into()
}

fn run_migrate(
	args: &MdvizCli,
	dry_run: bool,
	show_diff: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let ctx = load_context(args)?;
	let root = &ctx.root;
	let plan = plan_migration(&ctx)?;
	let summary = &plan.summary;

	print_plan_warnings(&plan, root);

	if args.verbose {
		for document in &plan.documents {
			let rel = make_relative(&document.path, root);
			let found = Dialect::ALL
				.into_iter()
				.map(|dialect| format!("{dialect} {}", document.detection.fenced.get(dialect)))
				.collect::<Vec<_>>()
				.join(", ");
			println!("  scanned {rel} ({found})");
		}
	}

	let action = if dry_run { "would update" } else { "updated" };
	for document in plan.changed() {
		let rel = make_relative(&document.path, root);
		println!("  {} {rel}", colored!(action, green));
		if show_diff {
			print!("{}", render_diff(&document.original, document.updated()));
		}
	}

	let mut failures = summary.failures.clone();
	if !dry_run {
		failures.extend(write_migration(&plan));
		print_failures(&failures[summary.failures.len()..], root);
	}

	if plan.is_up_to_date() {
		println!(
			"All posts are already migrated ({} file(s) scanned).",
			summary.processed_files
		);
	} else if dry_run {
		println!(
			"Dry run: would update {} of {} file(s).",
			summary.updated_files, summary.processed_files
		);
	} else {
		println!(
			"Updated {} of {} file(s).",
			summary.updated_files, summary.processed_files
		);
	}

	if !summary.converted.is_empty() {
		let converted = Dialect::CHARTS
			.into_iter()
			.map(|dialect| format!("{dialect} {}", summary.converted.get(dialect)))
			.collect::<Vec<_>>()
			.join(", ");
		println!("  converted blocks: {converted}");
	}
	if summary.normalized_containers > 0 {
		println!("  normalized containers: {}", summary.normalized_containers);
	}
	if summary.invalid_payloads > 0 {
		println!("  invalid payloads left unchanged: {}", summary.invalid_payloads);
	}

	if failures.is_empty() {
		Ok(())
	} else {
		Err(failure_error(failures.len()))
	}
}

fn run_check(args: &MdvizCli, show_diff: bool) -> Result<(), Box<dyn std::error::Error>> {
	let ctx = load_context(args)?;
	let root = &ctx.root;
	let plan = plan_migration(&ctx)?;

	print_plan_warnings(&plan, root);

	if !plan.summary.failures.is_empty() {
		return Err(failure_error(plan.summary.failures.len()));
	}

	if plan.is_up_to_date() {
		println!(
			"Check passed: all {} post(s) are migrated.",
			plan.summary.processed_files
		);
		return Ok(());
	}

	eprintln!("Check failed.");
	eprintln!();
	eprintln!("Posts needing migration:");
	for document in plan.changed() {
		let rel = make_relative(&document.path, root);
		eprintln!("  {rel}");
		if show_diff {
			eprint!("{}", render_diff(&document.original, document.updated()));
		}
	}
	eprintln!();
	eprintln!(
		"{} post(s) are out of date. Run `mdviz migrate` to fix.",
		plan.summary.updated_files
	);

	process::exit(1);
}

fn run_analyze(
	args: &MdvizCli,
	format: AnalyzeOutputFormat,
	output: Option<&Path>,
	no_export: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let ctx = load_context(args)?;
	let root = &ctx.root;
	let report = analyze_project(&ctx)?;

	print_failures(&report.failures, root);

	match format {
		AnalyzeOutputFormat::Json => println!("{}", report.to_json()?),
		AnalyzeOutputFormat::Text => print_report(&report),
	}

	if !no_export {
		let destination = output.map_or_else(|| ctx.report_output.clone(), |path| root.join(path));
		export_report(&report, &destination)?;

		let message = format!("Report written to {}", make_relative(&destination, root));
		match format {
			AnalyzeOutputFormat::Json => eprintln!("{message}"),
			AnalyzeOutputFormat::Text => {
				println!();
				println!("{message}");
			}
		}
	}

	if report.failures.is_empty() {
		Ok(())
	} else {
		Err(failure_error(report.failures.len()))
	}
}

fn print_report(report: &PerformanceReport) {
	println!("{}", colored!("mdviz analyze", bold));

	print_section("Summary");
	print_field("Files analyzed", report.total_files);
	print_field("Files with visualizations", report.files_with_visualizations);
	print_field("Total visualizations", report.visualization_types.total());
	let rating = format!(
		"{} ({})",
		report.rating.as_str(),
		report.rating.description()
	);
	if report.rating.is_concerning() {
		print_field("Rating", colored!(rating, yellow));
	} else {
		print_field("Rating", colored!(rating, green));
	}

	print_section("Visualization types");
	for (name, count) in report.visualization_types.entries() {
		print_field(name, count);
	}

	let flagged: Vec<_> = report
		.file_details
		.iter()
		.filter(|file| !file.issues.is_empty())
		.collect();
	if !flagged.is_empty() {
		print_section("Files with issues");
		for file in flagged {
			println!(
				"  {} ({} visualization(s), {:.1}KB, complexity {})",
				file.file, file.visualization_count, file.size_kb, file.complexity
			);
			for issue in &file.issues {
				println!("    - {issue}");
			}
		}
	}

	if !report.optimization_suggestions.is_empty() {
		print_section("Suggestions");
		for suggestion in &report.optimization_suggestions {
			println!("  - {suggestion}");
		}
	}
}

/// Render a unified diff between two strings, colorized.
fn render_diff(current: &str, expected: &str) -> String {
	let diff = TextDiff::from_lines(current, expected);
	let mut output = String::new();

	for group in diff.grouped_ops(2) {
		for op in group {
			for change in diff.iter_changes(&op) {
				let line = match change.tag() {
					ChangeTag::Delete => format!("  {}", colored!(format!("-{change}"), red)),
					ChangeTag::Insert => format!("  {}", colored!(format!("+{change}"), green)),
					ChangeTag::Equal => format!("   {change}"),
				};
				output.push_str(&line);
				if change.missing_newline() {
					output.push('\n');
				}
			}
		}
	}

	output
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
