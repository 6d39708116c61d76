use crate::PassOutput;
use crate::lines::FenceTracker;
use crate::lines::column_count;
use crate::lines::has_pipe;
use crate::lines::separator_row;
use crate::lines::split_cells;

/// Rewrite malformed separator lines to the canonical `| ----- | ... |` form.
///
/// The column count comes from the pipes of the line itself, never from the
/// surrounding rows. Lines that would produce zero columns are left alone.
pub fn repair_separators(content: &str, respect_code_fences: bool) -> PassOutput {
	let mut tracker = FenceTracker::new(respect_code_fences);
	let lines: Vec<String> = content
		.split('\n')
		.map(|line| {
			if tracker.observe(line).is_code() || !is_separator_candidate(line) {
				return line.to_string();
			}

			match column_count(line) {
				0 => line.to_string(),
				columns => separator_row(columns),
			}
		})
		.collect();

	PassOutput::new(content, lines.join("\n"))
}

/// A line made only of pipes, whitespace and dash/equals runs, where every
/// cell holds a run and at least one run is three or more characters long.
pub fn is_separator_candidate(line: &str) -> bool {
	if !has_pipe(line) {
		return false;
	}

	if !line
		.chars()
		.all(|ch| matches!(ch, '|' | '-' | '=') || ch.is_whitespace())
	{
		return false;
	}

	let cells = split_cells(line);
	!cells.is_empty()
		&& cells.iter().all(|cell| !cell.is_empty() && !cell.contains(char::is_whitespace))
		&& cells.iter().any(|cell| cell.len() >= 3)
}
