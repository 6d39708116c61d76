use crate::lines::format_row;
use crate::lines::separator_row;
use crate::table::Cell;
use crate::table::Row;
use crate::table::TableFragment;

/// Options for rendering parsed html tables as markdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
	/// Render the first cell of data rows that contain a `<br>` as
	/// `` `name` [Required]<br/>type ``, the layout used by generated API
	/// field references.
	///
	/// The `[Required]` annotation is written for every such row, including
	/// fields that are optional in the source documentation.
	pub field_reference: bool,
}

/// Render a parsed fragment as a markdown table. Returns `None` when the
/// fragment has no rows.
pub fn render_table(fragment: &TableFragment<'_>, options: RenderOptions) -> Option<String> {
	if !fragment.is_parsed() {
		return None;
	}

	Some(render_rows(&fragment.rows, options))
}

/// Render rows as a header line, a separator sized from the header, and one
/// line per data row. Every line ends with a newline.
///
/// Data rows keep their natural cell count; reconciling them with the header
/// is left to the structure validator.
pub fn render_rows(rows: &[Row], options: RenderOptions) -> String {
	let Some((header, data)) = rows.split_first() else {
		return String::new();
	};

	let mut markdown = String::new();
	markdown.push_str(&render_row(header, options));
	markdown.push('\n');
	markdown.push_str(&separator_row(header.len()));
	markdown.push('\n');

	for row in data {
		markdown.push_str(&render_row(row, options));
		markdown.push('\n');
	}

	markdown
}

fn render_row(row: &Row, options: RenderOptions) -> String {
	let cells: Vec<String> = row
		.iter()
		.enumerate()
		.map(|(index, cell)| {
			if options.field_reference && index == 0 && !row.is_header() {
				render_field_cell(cell)
			} else {
				cell.text.clone()
			}
		})
		.collect();

	format_row(&cells)
}

fn render_field_cell(cell: &Cell) -> String {
	let Some((name, rest)) = cell.parts.split_first() else {
		return cell.text.clone();
	};

	let field_type = rest
		.iter()
		.filter(|part| !part.is_empty())
		.cloned()
		.collect::<Vec<_>>()
		.join(" ");

	if name.is_empty() || field_type.is_empty() {
		return cell.text.clone();
	}

	format!("`{name}` [Required]<br/>{field_type}")
}
