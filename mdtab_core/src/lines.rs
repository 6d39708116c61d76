//! Line-level helpers shared by the scanning passes: pipe counting that
//! respects `\|` escapes, canonical row formatting and code fence tracking.

use std::ops::Range;

/// Placeholder written into every cell of a canonical separator row.
pub const SEPARATOR_CELL: &str = "-----";

/// Count the unescaped `|` characters in a line.
///
/// A pipe preceded by an odd number of backslashes is escaped and belongs to
/// cell content.
pub fn count_pipes(line: &str) -> usize {
	pipe_offsets(line).len()
}

/// Number of columns a line declares, derived from its pipe count.
pub fn column_count(line: &str) -> usize {
	count_pipes(line).saturating_sub(1)
}

/// Whether the line contains at least one unescaped pipe.
pub fn has_pipe(line: &str) -> bool {
	!pipe_offsets(line).is_empty()
}

fn pipe_offsets(line: &str) -> Vec<usize> {
	let mut offsets = Vec::new();
	let mut backslashes = 0usize;

	for (offset, ch) in line.char_indices() {
		match ch {
			'\\' => backslashes += 1,
			'|' => {
				if backslashes % 2 == 0 {
					offsets.push(offset);
				}
				backslashes = 0;
			}
			_ => backslashes = 0,
		}
	}

	offsets
}

/// Split a table line on its unescaped pipes and trim each token.
///
/// The empty tokens produced by a leading or trailing pipe are dropped;
/// empty cells in between are kept.
pub fn split_cells(line: &str) -> Vec<&str> {
	let trimmed = line.trim();
	let mut tokens = Vec::new();
	let mut start = 0;

	for offset in pipe_offsets(trimmed) {
		tokens.push(trimmed[start..offset].trim());
		start = offset + 1;
	}
	tokens.push(trimmed[start..].trim());

	if trimmed.starts_with('|') && !tokens.is_empty() {
		tokens.remove(0);
	}

	if ends_with_pipe(trimmed) && !tokens.is_empty() {
		tokens.pop();
	}

	tokens
}

/// Whether the trimmed line ends with an unescaped pipe.
pub fn ends_with_pipe(line: &str) -> bool {
	let trimmed = line.trim_end();
	pipe_offsets(trimmed)
		.last()
		.is_some_and(|offset| offset + 1 == trimmed.len())
}

/// Join cells into the canonical `| c1 | c2 |` row form.
pub fn format_row<S: AsRef<str>>(cells: &[S]) -> String {
	let cells: Vec<&str> = cells.iter().map(AsRef::as_ref).collect();
	format!("| {} |", cells.join(" | "))
}

/// Build the canonical separator row for `columns` cells.
pub fn separator_row(columns: usize) -> String {
	format_row(&vec![SEPARATOR_CELL; columns])
}

pub fn is_blank(line: &str) -> bool {
	line.trim().is_empty()
}

/// ATX heading marker at the start of the line.
pub fn is_heading(line: &str) -> bool {
	line.trim_start().starts_with('#')
}

/// Bold or emphasis lead-in such as `**Note:**` or `__Deprecated__`.
pub fn is_emphasis_line(line: &str) -> bool {
	let trimmed = line.trim_start();
	trimmed.starts_with("**") || trimmed.starts_with("__")
}

/// Whether a line has the shape of a table separator: at least one pipe and
/// one dash, and nothing besides pipes, dashes, colons, equals signs and
/// whitespace.
pub fn looks_like_separator(line: &str) -> bool {
	line.contains('-')
		&& line.contains('|')
		&& line
			.chars()
			.all(|ch| matches!(ch, '|' | '-' | ':' | '=') || ch.is_whitespace())
}

/// How a line relates to fenced code blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineContext {
	/// Ordinary markdown text.
	Text,
	/// An opening or closing fence delimiter (```` ``` ```` or `~~~`).
	Fence,
	/// A line inside a fenced code block.
	Code,
}

impl LineContext {
	/// Lines the table passes must leave untouched.
	pub fn is_code(self) -> bool {
		matches!(self, Self::Fence | Self::Code)
	}
}

/// Tracks fenced code blocks while scanning lines in order.
///
/// When disabled every line is reported as [`LineContext::Text`].
#[derive(Debug, Clone)]
pub struct FenceTracker {
	enabled: bool,
	open: Option<(char, usize)>,
}

impl FenceTracker {
	pub fn new(enabled: bool) -> Self {
		Self {
			enabled,
			open: None,
		}
	}

	/// Classify the next line and advance the fence state.
	pub fn observe(&mut self, line: &str) -> LineContext {
		if !self.enabled {
			return LineContext::Text;
		}

		match self.open {
			Some((marker, count)) => {
				if is_closing_fence(line, marker, count) {
					self.open = None;
					LineContext::Fence
				} else {
					LineContext::Code
				}
			}
			None => {
				if let Some(fence) = detect_fence(line) {
					self.open = Some(fence);
					LineContext::Fence
				} else {
					LineContext::Text
				}
			}
		}
	}
}

/// Whether the line would open a fenced code block.
pub fn opens_fence(line: &str) -> bool {
	detect_fence(line).is_some()
}

/// Detect an opening fence: up to three spaces of indentation followed by
/// three or more backticks or tildes.
fn detect_fence(line: &str) -> Option<(char, usize)> {
	let indent = line.len() - line.trim_start_matches(' ').len();
	if indent > 3 {
		return None;
	}

	let rest = &line[indent..];
	let marker = rest.chars().next().filter(|ch| matches!(ch, '`' | '~'))?;
	let count = rest.chars().take_while(|&ch| ch == marker).count();
	if count < 3 {
		return None;
	}

	// Backtick fences cannot carry backticks in their info string.
	if marker == '`' && rest[count..].contains('`') {
		return None;
	}

	Some((marker, count))
}

fn is_closing_fence(line: &str, marker: char, count: usize) -> bool {
	let indent = line.len() - line.trim_start_matches(' ').len();
	if indent > 3 {
		return false;
	}

	let rest = &line[indent..];
	let run = rest.chars().take_while(|&ch| ch == marker).count();
	run >= count && rest[run * marker.len_utf8()..].trim().is_empty()
}

/// Byte ranges of every fenced code block (delimiters included).
///
/// An unclosed fence runs to the end of the content.
pub fn fenced_ranges(content: &str) -> Vec<Range<usize>> {
	let mut ranges = Vec::new();
	let mut tracker = FenceTracker::new(true);
	let mut block_start = None;
	let mut offset = 0;

	for line in content.split_inclusive('\n') {
		let text = line.trim_end_matches(['\n', '\r']);
		let end = offset + line.len();

		if tracker.observe(text) == LineContext::Fence {
			match block_start.take() {
				Some(start) => ranges.push(start..end),
				None => block_start = Some(offset),
			}
		}

		offset = end;
	}

	if let Some(start) = block_start {
		ranges.push(start..content.len());
	}

	ranges
}
