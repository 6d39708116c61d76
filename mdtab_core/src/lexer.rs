use logos::Logos;

/// Raw tokens produced by logos for flat tokenization of an html table
/// fragment. Only the table structure tags are recognized; every other tag
/// is reported as [`RawToken::Tag`] and stripped.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
	#[regex(r"<[tT][rR](\s[^>]*)?>", priority = 10)]
	RowOpen,
	#[regex(r"</[tT][rR]\s*>", priority = 10)]
	RowClose,
	#[regex(r"<[tT][hH](\s[^>]*)?>", priority = 10)]
	HeaderCellOpen,
	#[regex(r"<[tT][dD](\s[^>]*)?>", priority = 10)]
	DataCellOpen,
	#[regex(r"</[tT][dDhH]\s*>", priority = 10)]
	CellClose,
	#[regex(r"<[bB][rR](\s[^>]*)?/?>", priority = 10)]
	LineBreak,
	#[regex(r"<[^<>]*>", priority = 1)]
	Tag,
	#[regex(r"[^<]+")]
	Text,
	#[token("<")]
	LessThan,
}

/// Structural tokens of an html table fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(variant_size_differences)]
pub(crate) enum HtmlToken<'a> {
	/// `<tr ...>`
	RowOpen,
	/// `</tr>`
	RowClose,
	/// `<td ...>` or `<th ...>`.
	CellOpen { header: bool },
	/// `</td>` or `</th>`
	CellClose,
	/// `<br>`, `<br/>` or `<br />`
	LineBreak,
	/// Text between tags, verbatim.
	Text(&'a str),
}

/// Tokenize an html fragment into the tokens the table parser cares about.
/// Unrecognized tags are dropped and unlexable input is kept as text.
pub(crate) fn tokenize_html(source: &str) -> Vec<HtmlToken<'_>> {
	RawToken::lexer(source)
		.spanned()
		.filter_map(|(token, span)| {
			let slice = &source[span];
			match token {
				Ok(RawToken::RowOpen) => Some(HtmlToken::RowOpen),
				Ok(RawToken::RowClose) => Some(HtmlToken::RowClose),
				Ok(RawToken::HeaderCellOpen) => Some(HtmlToken::CellOpen { header: true }),
				Ok(RawToken::DataCellOpen) => Some(HtmlToken::CellOpen { header: false }),
				Ok(RawToken::CellClose) => Some(HtmlToken::CellClose),
				Ok(RawToken::LineBreak) => Some(HtmlToken::LineBreak),
				Ok(RawToken::Tag) => None,
				Ok(RawToken::Text | RawToken::LessThan) | Err(()) => Some(HtmlToken::Text(slice)),
			}
		})
		.collect()
}
