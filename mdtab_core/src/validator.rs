use crate::PassOutput;
use crate::lines::FenceTracker;
use crate::lines::column_count;
use crate::lines::format_row;
use crate::lines::has_pipe;
use crate::lines::is_blank;
use crate::lines::is_heading;
use crate::lines::looks_like_separator;
use crate::lines::separator_row;
use crate::lines::split_cells;
use crate::separator::is_separator_candidate;

/// Where the validator is while scanning a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
	NotInTable,
	InTable { expected_columns: usize },
}

/// Enforce the structural invariants of every markdown table in `content`.
///
/// Each table gets a separator sized to its header directly below the
/// header, and every data row is padded or truncated to the header's column
/// count. Rows that already match are left byte-for-byte as they are.
pub fn validate_structure(content: &str, respect_code_fences: bool) -> PassOutput {
	let lines: Vec<&str> = content.split('\n').collect();
	let mut output: Vec<String> = Vec::with_capacity(lines.len() + 1);
	let mut tracker = FenceTracker::new(respect_code_fences);
	let mut state = ScanState::NotInTable;
	let mut index = 0;

	while index < lines.len() {
		let line = lines[index];
		index += 1;

		if tracker.observe(line).is_code() {
			state = ScanState::NotInTable;
			output.push(line.to_string());
			continue;
		}

		state = match state {
			ScanState::NotInTable => {
				output.push(line.to_string());
				let Some(expected_columns) = header_columns(line) else {
					continue;
				};

				match lines.get(index) {
					Some(next) if looks_like_separator(next) => {
						index += 1;
						tracker.observe(next);
						if column_count(next) == expected_columns {
							output.push((*next).to_string());
						} else {
							output.push(separator_row(expected_columns));
						}
					}
					_ => output.push(separator_row(expected_columns)),
				}

				ScanState::InTable { expected_columns }
			}
			ScanState::InTable { expected_columns } => {
				if ends_table(line) {
					output.push(line.to_string());
					ScanState::NotInTable
				} else {
					output.push(reconcile_row(line, expected_columns));
					state
				}
			}
		};
	}

	PassOutput::new(content, output.join("\n"))
}

/// Column count of a line that can open a table: it starts with a pipe, is
/// not a heading and declares at least one column.
fn header_columns(line: &str) -> Option<usize> {
	if !line.trim_start().starts_with('|') || is_heading(line) {
		return None;
	}

	match column_count(line) {
		0 => None,
		columns => Some(columns),
	}
}

fn ends_table(line: &str) -> bool {
	is_blank(line) || !has_pipe(line) || is_heading(line)
}

/// Pad or truncate a row to `expected_columns` cells. Rows that already have
/// the right count are returned unchanged.
///
/// A rebuilt row made only of dash runs is emitted as the canonical separator
/// so that a second run leaves it alone.
fn reconcile_row(line: &str, expected_columns: usize) -> String {
	if column_count(line) == expected_columns {
		return line.to_string();
	}

	let mut cells = split_cells(line);
	cells.resize(expected_columns, "");
	let row = format_row(&cells);
	if is_separator_candidate(&row) {
		return separator_row(expected_columns);
	}

	row
}
