use std::path::Path;
use std::process;

use clap::Parser;
use mdtab_cli::MdtabCli;
use mdtab_cli::OutputFormat;
use mdtab_core::FileReport;
use mdtab_core::FileStatus;
use mdtab_core::MdtabConfig;
use mdtab_core::NormalizeOptions;
use mdtab_core::RunOptions;
use mdtab_core::RunSummary;
use mdtab_core::ScanOptions;
use mdtab_core::process_path;
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
	let args = MdtabCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_logging(args.verbose, use_color);

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

	if let Err(e) = run(&args) {
		match e.downcast::<mdtab_core::MdtabError>() {
			Ok(mdtab_err) => {
				let report: miette::Report = (*mdtab_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(1);
	}
}

/// Log to stderr, filtered by `MDTAB_LOG` when it is set.
fn init_logging(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let env_filter =
		EnvFilter::try_from_env("MDTAB_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.without_time()
		.init();
}

fn run(args: &MdtabCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = args.path.as_path();
	if !root.exists() {
		return Err(mdtab_core::MdtabError::PathNotFound(root.display().to_string()).into());
	}

	let config = MdtabConfig::load_or_default(root)?;
	let scan = ScanOptions::from_config(&config, !args.no_recursive)?;
	let options = RunOptions {
		backup: args.backup,
		dry_run: args.dry_run,
		max_file_size: Some(config.max_file_size),
		normalize: NormalizeOptions::from(config.normalize),
	};

	let summary = process_path(root, &scan, &options)?;
	let display_root = if root.is_file() {
		root.parent().unwrap_or(root)
	} else {
		root
	};

	match args.format {
		OutputFormat::Json => print_json(&summary, display_root, args.dry_run)?,
		OutputFormat::Text => print_text(&summary, display_root, args),
	}

	Ok(())
}

fn print_text(summary: &RunSummary, root: &Path, args: &MdtabCli) {
	for file in &summary.files {
		let rel = make_relative(&file.path, root);

		match &file.status {
			FileStatus::Modified => {
				let verb = if args.dry_run {
					"Would update"
				} else {
					"Updated"
				};
				println!("{} {rel} ({})", colored!(verb, green), pass_list(file));

				if args.diff {
					if let Some(change) = &file.change {
						print_diff(&change.before, &change.after);
					}
				}
			}
			FileStatus::Unchanged => {
				if args.verbose {
					println!("Unchanged {rel}");
				}
			}
			FileStatus::Failed { message } => {
				eprintln!("{} {rel}: {message}", colored!("warning:", yellow));
			}
		}
	}

	let modified = summary.modified_count();
	let noun = if modified == 1 { "file" } else { "files" };
	let line = if args.dry_run {
		format!("Dry run: {modified} {noun} would be modified.")
	} else {
		format!("Conversion complete. {modified} {noun} modified.")
	};
	println!("{}", colored!(line, bold));
}

fn print_json(
	summary: &RunSummary,
	root: &Path,
	dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let files: Vec<serde_json::Value> = summary
		.files
		.iter()
		.map(|file| {
			let mut value = serde_json::to_value(file)?;
			value["path"] = serde_json::Value::String(make_relative(&file.path, root));
			Ok(value)
		})
		.collect::<Result<_, serde_json::Error>>()?;

	let output = serde_json::json!({
		"modified": summary.modified_count(),
		"failed": summary.failed_count(),
		"dry_run": dry_run,
		"files": files,
	});
	println!("{}", serde_json::to_string_pretty(&output)?);

	Ok(())
}

fn pass_list(file: &FileReport) -> String {
	file.passes
		.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join(", ")
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				print!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				print!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				print!("   {change}");
			}
		}
	}
	println!();
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	let relative = path.strip_prefix(root).unwrap_or(path);
	if relative.as_os_str().is_empty() {
		return path.display().to_string();
	}

	relative.display().to_string()
}
