use std::ops::Range;
use std::sync::LazyLock;

use regex::Matches;
use regex::Regex;

use crate::lexer::HtmlToken;
use crate::lexer::tokenize_html;
use crate::lines::fenced_ranges;
use crate::table::Cell;
use crate::table::Row;
use crate::table::RowKind;
use crate::table::TableFragment;

/// The first `<table ...>` up to the first following `</table>`. Nested
/// tables are not supported.
static TABLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?is)<table\b[^>]*>.*?</table\s*>").expect("table pattern is a valid regex")
});

/// Lazily locate the html tables in `content` and parse each one into rows.
///
/// Fragments that start inside a fenced code block are skipped when
/// `respect_code_fences` is set. A fragment that yields no rows is still
/// produced, with an empty row list, so the caller can leave it untouched.
pub fn extract_tables(content: &str, respect_code_fences: bool) -> TableFragments<'_> {
	let fenced = if respect_code_fences {
		fenced_ranges(content)
	} else {
		Vec::new()
	};

	TableFragments {
		matches: TABLE_PATTERN.find_iter(content),
		fenced,
	}
}

/// Iterator over the html table fragments of a document.
#[derive(Debug)]
pub struct TableFragments<'a> {
	matches: Matches<'static, 'a>,
	fenced: Vec<Range<usize>>,
}

impl<'a> Iterator for TableFragments<'a> {
	type Item = TableFragment<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			let found = self.matches.next()?;
			if self
				.fenced
				.iter()
				.any(|range| range.contains(&found.start()))
			{
				continue;
			}

			return Some(TableFragment {
				span: found.range(),
				source: found.as_str(),
				rows: parse_table_rows(found.as_str()),
			});
		}
	}
}

/// Parse the rows of a single html table fragment.
///
/// Every `<tr>` becomes a row and every `<td>`/`<th>` inside it a cell.
/// Unclosed cells and rows are closed by the next opening tag. Rows without
/// cells are dropped; the first remaining row is the header.
pub fn parse_table_rows(source: &str) -> Vec<Row> {
	let mut builder = RowBuilder::default();

	for token in tokenize_html(source) {
		match token {
			HtmlToken::RowOpen => {
				builder.finish_row();
				builder.row = Some(Vec::new());
			}
			HtmlToken::RowClose => builder.finish_row(),
			HtmlToken::CellOpen { .. } => {
				builder.finish_cell();
				builder.row.get_or_insert_with(Vec::new);
				builder.cell = Some(vec![String::new()]);
			}
			HtmlToken::CellClose => builder.finish_cell(),
			HtmlToken::LineBreak => {
				if let Some(segments) = builder.cell.as_mut() {
					segments.push(String::new());
				}
			}
			HtmlToken::Text(text) => {
				if let Some(segment) = builder.cell.as_mut().and_then(|cell| cell.last_mut()) {
					segment.push_str(text);
				}
			}
		}
	}

	builder.finish_row();
	builder
		.rows
		.into_iter()
		.enumerate()
		.map(|(index, cells)| {
			let kind = if index == 0 {
				RowKind::Header
			} else {
				RowKind::Data
			};
			Row::new(kind, cells)
		})
		.collect()
}

#[derive(Default)]
struct RowBuilder {
	rows: Vec<Vec<Cell>>,
	row: Option<Vec<Cell>>,
	cell: Option<Vec<String>>,
}

impl RowBuilder {
	fn finish_cell(&mut self) {
		let Some(segments) = self.cell.take() else {
			return;
		};

		self.row
			.get_or_insert_with(Vec::new)
			.push(Cell::from_segments(&segments));
	}

	fn finish_row(&mut self) {
		self.finish_cell();
		if let Some(cells) = self.row.take() {
			if !cells.is_empty() {
				self.rows.push(cells);
			}
		}
	}
}
