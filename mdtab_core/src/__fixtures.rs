use std::path::Path;

use crate::lines::FenceTracker;

pub const HTML_FIELD_TABLE: &str =
	"<table><tr><th>Field</th><th>Description</th></tr><tr><td>a</td><td>b</td></tr></table>";

pub const CANONICAL_DOCUMENT: &str = "# Options\n\nThe following options are supported.\n\n| Option | \
                                      Type | Default |\n| ----- | ----- | ----- |\n| `depth` | \
                                      number | `3` |\n| `mode` | string | `\"fast\"` |\n\nSee \
                                      also the [guide](./guide.md).\n";

pub const ALIGNED_DOCUMENT: &str = "| Left | Right |\n|:-----|------:|\n| a | b |\n";

pub const MESSY_DOCUMENT: &str = "# API\n\n<table>\n  \
                                  <tr><th>Name</th><th>Type</th></tr>\n  \
                                  <tr><td>id</td><td>string</td></tr>\n  <tr><td>tags</td><td>a \
                                  | b</td></tr>\n</table>\n\n| Key | Value | Notes |\n|---|---|\n| \
                                  one | 1 |\n| two | 2 | extra | more |\nwrapped line for two\n";

pub const FENCED_DOCUMENT: &str = "Example:\n\n```html\n<table><tr><td>x</td></tr></table>\n|---|--|\n| \
                                   a | b |\nwrapped\n```\n";

pub const FIELD_REFERENCE_TABLE: &str = "<table><tr><th>Field</th><th>Description</th></tr><tr><td>\
                                         name<br/>string</td><td>The name.</td></tr><tr><td>count<br \
                                         />integer</td><td>How many.</td></tr></table>";

/// Documents used for the pipeline-wide properties.
pub fn property_documents() -> Vec<&'static str> {
	vec![
		HTML_FIELD_TABLE,
		CANONICAL_DOCUMENT,
		ALIGNED_DOCUMENT,
		MESSY_DOCUMENT,
		FENCED_DOCUMENT,
		FIELD_REFERENCE_TABLE,
		"| A | B |\n|---|--|\n| 1 | 2 |\n",
		"| A | B |\ncontinued text\n",
		"| A | B | C |\n| x |\n",
		"Intro <TABLE class=\"api\"><TR><TD>a|b</TD></TR></TABLE> outro\n",
		"|===|===|\n\n| lonely |\n",
		"| A | B |\n| --- | --- |\n| --- | --- | note |\n",
		"| A | B |\n| --- | --- |\n--- | ---\n",
		"",
	]
}

/// Single lines that exercise every branch of the line passes.
pub const LINE_SHAPES: &[&str] = &[
	"| A | B |",
	"| --- | --- |",
	"| --- | --- | note |",
	"--- | ---",
	"---|---",
	"|---|--|",
	"|:--|--:|",
	"| x |",
	"| 1 | 2 | 3 |",
	"| a \\| b |",
	"use a | b here",
	"continued text",
	"## Heading",
	"**Note:**",
	"",
	"```",
	"<table><tr><td>a</td></tr></table>",
];

/// Every document made of `length` lines drawn from [`LINE_SHAPES`].
pub fn generated_documents(length: u32) -> Vec<String> {
	let total = LINE_SHAPES.len().pow(length);
	(0..total)
		.map(|mut index| {
			let mut lines = Vec::new();
			for _ in 0..length {
				lines.push(LINE_SHAPES[index % LINE_SHAPES.len()]);
				index /= LINE_SHAPES.len();
			}

			format!("{}\n", lines.join("\n"))
		})
		.collect()
}

/// The fixed property documents followed by the generated ones.
pub fn property_corpus() -> Vec<String> {
	property_documents()
		.into_iter()
		.map(ToString::to_string)
		.chain(generated_documents(3))
		.collect()
}

pub fn write_file(root: &Path, relative: &str, content: &str) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create dir: {e}"));
	}

	std::fs::write(path, content).unwrap_or_else(|e| panic!("write: {e}"));
}

pub fn read_file(root: &Path, relative: &str) -> String {
	std::fs::read_to_string(root.join(relative)).unwrap_or_else(|e| panic!("read: {e}"))
}

/// Group the lines of `content` that start with a pipe into tables, ignoring
/// fenced code blocks.
pub fn markdown_tables(content: &str) -> Vec<Vec<&str>> {
	let mut tables = Vec::new();
	let mut current: Vec<&str> = Vec::new();
	let mut tracker = FenceTracker::new(true);

	for line in content.lines() {
		if !tracker.observe(line).is_code() && line.trim_start().starts_with('|') {
			current.push(line);
		} else if !current.is_empty() {
			tables.push(std::mem::take(&mut current));
		}
	}

	if !current.is_empty() {
		tables.push(current);
	}

	tables
}
