use std::fmt;

use serde::Serialize;

use crate::extractor::extract_tables;
use crate::render::RenderOptions;
use crate::render::render_table;
use crate::separator::repair_separators;
use crate::stitcher::stitch_rows;
use crate::validator::validate_structure;

/// The text produced by one pass and whether it differs from its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutput {
	pub content: String,
	pub changed: bool,
}

impl PassOutput {
	/// Wrap the output of a pass, comparing it with the pass input.
	pub fn new(input: &str, content: String) -> Self {
		let changed = content != input;
		Self { content, changed }
	}
}

/// The passes of the normalization pipeline, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PassKind {
	ConvertHtmlTables,
	RepairSeparators,
	StitchRows,
	ValidateStructure,
}

impl PassKind {
	pub const ALL: [Self; 4] = [
		Self::ConvertHtmlTables,
		Self::RepairSeparators,
		Self::StitchRows,
		Self::ValidateStructure,
	];

	pub fn name(self) -> &'static str {
		match self {
			Self::ConvertHtmlTables => "convert-html-tables",
			Self::RepairSeparators => "repair-separators",
			Self::StitchRows => "stitch-rows",
			Self::ValidateStructure => "validate-structure",
		}
	}

	fn run(self, content: &str, options: &NormalizeOptions) -> PassOutput {
		match self {
			Self::ConvertHtmlTables => convert_html_tables(content, options),
			Self::RepairSeparators => repair_separators(content, options.respect_code_fences),
			Self::StitchRows => stitch_rows(content, options.respect_code_fences),
			Self::ValidateStructure => validate_structure(content, options.respect_code_fences),
		}
	}
}

impl fmt::Display for PassKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Options shared by every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
	/// Leave the contents of fenced code blocks untouched.
	pub respect_code_fences: bool,
	/// Render html tables in the field reference style. See
	/// [`RenderOptions::field_reference`].
	pub field_reference: bool,
}

impl Default for NormalizeOptions {
	fn default() -> Self {
		Self {
			respect_code_fences: true,
			field_reference: false,
		}
	}
}

/// The result of running the full pipeline over one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
	/// The normalized document.
	pub content: String,
	/// `true` when at least one pass changed the document.
	pub changed: bool,
	/// The passes that changed the document, in run order.
	pub passes: Vec<PassKind>,
}

impl Normalized {
	pub fn into_parts(self) -> (String, bool) {
		(self.content, self.changed)
	}
}

/// Run every pass over `content` in order: html conversion, separator
/// repair, row stitching and structure validation.
///
/// CRLF documents are processed as LF and converted back. When no pass
/// changes anything the input is returned exactly as it was given.
pub fn normalize(content: &str, options: &NormalizeOptions) -> Normalized {
	let crlf = content.contains("\r\n");
	let mut current = if crlf {
		content.replace("\r\n", "\n")
	} else {
		content.to_string()
	};
	let mut passes = Vec::new();

	for pass in PassKind::ALL {
		let output = pass.run(&current, options);
		if output.changed {
			tracing::debug!(pass = pass.name(), "pass changed the document");
			passes.push(pass);
			current = output.content;
		}
	}

	if passes.is_empty() {
		return Normalized {
			content: content.to_string(),
			changed: false,
			passes,
		};
	}

	if crlf {
		current = current.replace('\n', "\r\n");
	}

	Normalized {
		changed: current != content,
		content: current,
		passes,
	}
}

/// Replace every html table in `content` with its markdown rendering.
///
/// Fragments that produce no rows are left as they are. A table that does
/// not start a line is moved onto its own line, and text following
/// `</table>` on the same line is moved below the table after a blank line.
/// Spaces and tabs around a moved table are dropped.
pub fn convert_html_tables(content: &str, options: &NormalizeOptions) -> PassOutput {
	let render_options = RenderOptions {
		field_reference: options.field_reference,
	};
	let mut converted = String::with_capacity(content.len());
	let mut last_end = 0;

	for fragment in extract_tables(content, options.respect_code_fences) {
		let Some(markdown) = render_table(&fragment, render_options) else {
			tracing::debug!(
				offset = fragment.span.start,
				"html table has no rows, leaving it unchanged"
			);
			continue;
		};

		let before = &content[last_end..fragment.span.start];
		converted.push_str(before.trim_end_matches([' ', '\t']));
		if !converted.is_empty() && !converted.ends_with('\n') {
			converted.push_str("\n\n");
		}

		converted.push_str(&markdown);

		// The rendered markdown already ends with a newline.
		let line_rest = content[fragment.span.end..]
			.split('\n')
			.next()
			.unwrap_or_default();
		let trailing = line_rest.trim_start_matches([' ', '\t']);
		last_end = fragment.span.end;
		if !trailing.is_empty() {
			converted.push('\n');
			last_end += line_rest.len() - trailing.len();
		}
	}

	converted.push_str(&content[last_end..]);
	PassOutput::new(content, converted)
}
