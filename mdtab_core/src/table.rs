use std::ops::Range;

use derive_more::Deref;
use derive_more::DerefMut;
use serde::Serialize;

/// Whether a row is the table header or a data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RowKind {
	Header,
	Data,
}

/// A single normalized table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
	/// The cell text with tags stripped, whitespace collapsed and pipes
	/// escaped.
	pub text: String,
	/// The same text split at `<br>` boundaries, each part normalized on its
	/// own. A cell without line breaks has exactly one part.
	pub parts: Vec<String>,
}

impl Cell {
	/// Build a cell from the raw text segments found between `<br>` tags.
	pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
		let parts: Vec<String> = segments
			.iter()
			.map(|segment| normalize_cell_text(segment.as_ref()))
			.collect();
		let joined: Vec<&str> = segments.iter().map(AsRef::as_ref).collect();
		let text = normalize_cell_text(&joined.join(" "));

		Self { text, parts }
	}
}

/// An ordered sequence of cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deref, DerefMut)]
pub struct Row {
	pub kind: RowKind,
	#[deref]
	#[deref_mut]
	pub cells: Vec<Cell>,
}

impl Row {
	pub fn new(kind: RowKind, cells: Vec<Cell>) -> Self {
		Self { kind, cells }
	}

	pub fn is_header(&self) -> bool {
		self.kind == RowKind::Header
	}
}

/// One HTML table located in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFragment<'a> {
	/// Byte span of the fragment in the document, from `<table` through
	/// `</table>`.
	pub span: Range<usize>,
	/// The exact source text of the fragment.
	pub source: &'a str,
	/// Parsed rows. The first row is the header. Empty when the fragment
	/// could not be parsed into at least one row.
	pub rows: Vec<Row>,
}

impl TableFragment<'_> {
	/// Whether the fragment produced at least one row.
	pub fn is_parsed(&self) -> bool {
		!self.rows.is_empty()
	}

	pub fn header(&self) -> Option<&Row> {
		self.rows.first()
	}

	/// Number of columns declared by the header row.
	pub fn column_count(&self) -> usize {
		self.header().map_or(0, |row| row.len())
	}
}

/// Normalize the text content of a cell: newlines become spaces, whitespace
/// runs collapse to a single space, the result is trimmed and unescaped pipes
/// are escaped as `\|`.
pub fn normalize_cell_text(text: &str) -> String {
	let collapsed = text.replace(['\n', '\r'], " ");
	let collapsed = collapsed.split_whitespace().collect::<Vec<_>>().join(" ");
	escape_pipes(&collapsed)
}

/// Escape every `|` that is not already escaped.
pub fn escape_pipes(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	let mut backslashes = 0usize;

	for ch in text.chars() {
		match ch {
			'\\' => backslashes += 1,
			'|' => {
				if backslashes % 2 == 0 {
					escaped.push('\\');
				}
				backslashes = 0;
			}
			_ => backslashes = 0,
		}
		escaped.push(ch);
	}

	escaped
}
