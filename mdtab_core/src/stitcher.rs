use crate::PassOutput;
use crate::lines::FenceTracker;
use crate::lines::ends_with_pipe;
use crate::lines::has_pipe;
use crate::lines::is_blank;
use crate::lines::is_emphasis_line;
use crate::lines::is_heading;
use crate::lines::opens_fence;

/// Merge wrapped continuation lines back into the table row they belong to.
///
/// A row start is any non-empty, non-heading line with a pipe. The lines
/// that follow it are consumed while they are non-empty, pipe-free, not
/// headings, not emphasis lead-ins and not fence delimiters. Their trimmed
/// text is appended to the last cell of the row.
pub fn stitch_rows(content: &str, respect_code_fences: bool) -> PassOutput {
	let lines: Vec<&str> = content.split('\n').collect();
	let mut output: Vec<String> = Vec::with_capacity(lines.len());
	let mut tracker = FenceTracker::new(respect_code_fences);
	let mut index = 0;

	while index < lines.len() {
		let line = lines[index];
		index += 1;

		if tracker.observe(line).is_code() || !is_row_start(line) {
			output.push(line.to_string());
			continue;
		}

		let mut continuations = Vec::new();
		while let Some(next) = lines.get(index) {
			if !is_continuation(next) || (respect_code_fences && opens_fence(next)) {
				break;
			}

			continuations.push(next.trim());
			index += 1;
		}

		if continuations.is_empty() {
			output.push(line.to_string());
		} else {
			output.push(append_to_last_cell(line, &continuations.join(" ")));
		}
	}

	PassOutput::new(content, output.join("\n"))
}

fn is_row_start(line: &str) -> bool {
	has_pipe(line) && !is_blank(line) && !is_heading(line)
}

fn is_continuation(line: &str) -> bool {
	!has_pipe(line) && !is_blank(line) && !is_heading(line) && !is_emphasis_line(line)
}

fn append_to_last_cell(row: &str, text: &str) -> String {
	let row = row.trim_end();
	if !ends_with_pipe(row) {
		return format!("{row} {text}");
	}

	let body = row[..row.len() - 1].trim_end();
	if body.is_empty() {
		format!("{text} |")
	} else {
		format!("{body} {text} |")
	}
}
