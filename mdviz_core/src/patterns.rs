//! Recognition rules shared by detection, rewriting, and analysis.
//!
//! A document is split into fenced code blocks and the prose between them.
//! Fences of every language are recognized so that a chart fence shown
//! inside, say, a ```` ```markdown ```` example is never mistaken for a real
//! one. Inline containers are only looked for in prose.

use std::borrow::Cow;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::Dialect;

/// Opening fence at the start of a line, optional info string, then the
/// shortest payload up to a closing fence alone on its line. The payload
/// group is absent when the closing fence directly follows the opening one.
///
/// Four-backtick fences come first so that examples nesting a regular fence
/// are consumed whole. They never carry a dialect.
static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(concat!(
		r"(?ms)^(?:````[^\n]*\n(?:.*?\r?\n)??````[ \t\r]*$",
		r"|```(?P<info>[^`\n]*)\n(?:(?P<payload>.*?)\r?\n)??```[ \t\r]*$)",
	))
	.expect("fenced block pattern must compile")
});

/// An opening `<div>` tag. Quoted attribute values may contain `>`.
static OPENING_DIV: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"(?i)<div\b(?P<attrs>(?:[^>"']|"[^"]*"|'[^']*')*)>"#)
		.expect("opening div pattern must compile")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r#"(?P<name>[^\s"'=<>/`]+)(?:\s*=\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)'|(?P<uq>[^\s"'=<>`]+)))?"#,
	)
	.expect("attribute pattern must compile")
});

/// A fenced code block of any language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fence<'a> {
	/// Byte range of the whole block, fences included.
	pub range: Range<usize>,
	/// Everything after the opening backticks on the first line.
	pub info: &'a str,
	/// Text between the fence lines, `None` for an empty block.
	pub payload: Option<&'a str>,
}

impl Fence<'_> {
	pub fn dialect(&self) -> Option<Dialect> {
		Dialect::from_tag(self.info.trim_end())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
	Prose(&'a str),
	Fence(Fence<'a>),
}

/// Split `text` into alternating prose and fenced segments. Concatenating
/// every segment's source reproduces `text` exactly.
pub(crate) fn segments(text: &str) -> Vec<Segment<'_>> {
	let mut segments = Vec::new();
	let mut cursor = 0;

	for captures in FENCED_BLOCK.captures_iter(text) {
		let Some(whole) = captures.get(0) else {
			continue;
		};

		if whole.start() > cursor {
			segments.push(Segment::Prose(&text[cursor..whole.start()]));
		}

		// The carriage return of a CRLF closing line stays with the prose.
		let end = if whole.as_str().ends_with('\r') {
			whole.end() - 1
		} else {
			whole.end()
		};

		segments.push(Segment::Fence(Fence {
			range: whole.start()..end,
			info: captures.name("info").map_or("", |m| m.as_str()),
			payload: captures.name("payload").map(|m| m.as_str()),
		}));
		cursor = end;
	}

	if cursor < text.len() {
		segments.push(Segment::Prose(&text[cursor..]));
	}

	segments
}

/// 1-indexed line number of a byte offset.
pub(crate) fn line_of(text: &str, offset: usize) -> usize {
	text[..offset].matches('\n').count() + 1
}

/// An attribute inside an opening tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Attribute<'a> {
	pub name: &'a str,
	/// Raw value without surrounding quotes, `None` for bare attributes.
	pub value: Option<&'a str>,
	/// Byte range of the value within the scanned haystack.
	pub value_range: Range<usize>,
	pub quoted: bool,
}

/// An opening `<div ...>` tag found in prose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OpeningDiv<'a> {
	attrs: &'a str,
	attrs_offset: usize,
}

impl<'a> OpeningDiv<'a> {
	pub fn attributes(&self) -> Vec<Attribute<'a>> {
		ATTRIBUTE
			.captures_iter(self.attrs)
			.filter_map(|captures| {
				let name = captures.name("name")?;
				let (value, quoted) = match (
					captures.name("dq"),
					captures.name("sq"),
					captures.name("uq"),
				) {
					(Some(value), ..) | (_, Some(value), _) => (Some(value), true),
					(.., Some(value)) => (Some(value), false),
					_ => (None, false),
				};
				let value_range = value.map_or(name.end()..name.end(), |m| m.range());

				Some(Attribute {
					name: name.as_str(),
					value: value.map(|m| m.as_str()),
					value_range: (self.attrs_offset + value_range.start)
						..(self.attrs_offset + value_range.end),
					quoted,
				})
			})
			.collect()
	}

	/// The first attribute called `name`, compared case-insensitively.
	pub fn attribute(&self, name: &str) -> Option<Attribute<'a>> {
		self.attributes()
			.into_iter()
			.find(|attribute| attribute.name.eq_ignore_ascii_case(name))
	}

	pub fn class(&self) -> Option<Attribute<'a>> {
		self.attribute("class")
	}

	pub fn has_class(&self, class: &str) -> bool {
		self.class()
			.and_then(|attribute| attribute.value)
			.is_some_and(|value| has_class_token(value, class))
	}
}

/// Every opening `<div>` tag in `haystack`.
pub(crate) fn opening_divs(haystack: &str) -> impl Iterator<Item = OpeningDiv<'_>> {
	OPENING_DIV.captures_iter(haystack).filter_map(|captures| {
		let attrs = captures.name("attrs")?;
		Some(OpeningDiv {
			attrs: attrs.as_str(),
			attrs_offset: attrs.start(),
		})
	})
}

pub(crate) fn has_class_token(value: &str, class: &str) -> bool {
	value.split_ascii_whitespace().any(|token| token == class)
}

/// Escape a value placed inside a single-quoted attribute.
pub(crate) fn escape_single_quoted(value: &str) -> Cow<'_, str> {
	escape_with(value, &[('\'', "&#39;")])
}

/// Escape a value placed inside a double-quoted attribute. Line breaks are
/// encoded too, so a decoded value never starts a new line of the document.
pub(crate) fn escape_double_quoted(value: &str) -> Cow<'_, str> {
	escape_with(value, &[('"', "&quot;"), ('\n', "&#10;"), ('\r', "&#13;")])
}

fn escape_with<'a>(value: &'a str, entities: &[(char, &str)]) -> Cow<'a, str> {
	let entity_for = |c: char| {
		entities
			.iter()
			.find(|(special, _)| *special == c)
			.map(|(_, entity)| *entity)
	};

	if !value.chars().any(|c| c == '&' || entity_for(c).is_some()) {
		return Cow::Borrowed(value);
	}

	let mut result = String::with_capacity(value.len() + 8);
	for c in value.chars() {
		match (c, entity_for(c)) {
			('&', _) => result.push_str("&amp;"),
			(_, Some(entity)) => result.push_str(entity),
			_ => result.push(c),
		}
	}
	Cow::Owned(result)
}

/// Decode the entities an attribute value may carry.
pub(crate) fn unescape_attribute(value: &str) -> Cow<'_, str> {
	if !value.contains('&') {
		return Cow::Borrowed(value);
	}

	Cow::Owned(
		value
			.replace("&#39;", "'")
			.replace("&#x27;", "'")
			.replace("&quot;", "\"")
			.replace("&#10;", "\n")
			.replace("&#13;", "\r")
			.replace("&lt;", "<")
			.replace("&gt;", ">")
			.replace("&amp;", "&"),
	)
}
