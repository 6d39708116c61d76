use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	name = "mdtab",
	author,
	version,
	about = "Convert html tables and repair broken markdown tables in generated documentation.",
	long_about = "mdtab rewrites the tables in markdown documentation into one canonical \
	              form.\n\nHtml `<table>` fragments become markdown tables, malformed separator \
	              lines are repaired, rows wrapped over several lines are stitched back together \
	              and every row is padded or truncated to its header's column count.\n\nFiles are \
	              only written when something changed.\n\nExamples:\n  mdtab docs/            \
	              Normalize every .md and .mdx file under docs/\n  mdtab api.md --backup  Keep \
	              the original as api.md.backup\n  mdtab docs/ --dry-run  Show what would change"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct MdtabCli {
	/// A markdown file, or a directory to search for markdown files.
	pub path: PathBuf,

	/// Only process files directly inside the target directory.
	#[arg(long, default_value_t = false)]
	pub no_recursive: bool,

	/// Copy each file to `<file>.backup` before overwriting it.
	#[arg(long, default_value_t = false)]
	pub backup: bool,

	/// Report which files would change without writing anything.
	#[arg(long, default_value_t = false)]
	pub dry_run: bool,

	/// Show a line diff for every modified file.
	#[arg(long, default_value_t = false)]
	pub diff: bool,

	/// Output format for the run summary.
	#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
	pub format: OutputFormat,

	/// Enable verbose output, including unchanged files and debug logs.
	#[arg(long, short, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// A single JSON object for programmatic consumption.
	Json,
}
