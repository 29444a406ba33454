use serde::Deserialize;
use serde::Serialize;

use crate::anchor::slugify;

/// The deepest heading level markdown supports (`######`).
pub const MAX_HEADING_LEVEL: u8 = 6;

/// An ATX heading found in markdown text.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Heading {
	/// Display text, trimmed. Trailing pilcrows are kept here and only
	/// removed from the anchor id.
	pub text: String,
	/// Number of leading `#` characters, `1..=6`.
	pub level: u8,
	/// Anchor fragment derived from `text` with [`slugify`].
	pub id: String,
}

impl Heading {
	/// Build a heading and derive its anchor id. `level` is clamped to
	/// `1..=6`.
	pub fn new(text: impl Into<String>, level: u8) -> Self {
		let text = text.into();
		let id = slugify(&text);
		Self {
			text,
			level: level.clamp(1, MAX_HEADING_LEVEL),
			id,
		}
	}
}

/// Extract ATX headings from markdown `text`, in source order.
///
/// Lines inside fenced code blocks are never treated as headings. Every line
/// starting with three or more backticks or tildes toggles the fence, so a
/// tilde line closes a backtick fence and vice versa. An unclosed fence runs
/// to the end of the input. Headings deeper than `max_level` are skipped.
///
/// Repeated heading text yields repeated entries with identical ids.
pub fn extract_headings(text: impl AsRef<str>, max_level: u8) -> Vec<Heading> {
	let mut headings = Vec::new();
	let mut in_fence = false;

	for line in text.as_ref().split('\n') {
		let line = line.strip_suffix('\r').unwrap_or(line);

		if is_fence_line(line) {
			in_fence = !in_fence;
			continue;
		}

		if in_fence {
			continue;
		}

		let Some((level, heading_text)) = parse_atx_heading(line) else {
			continue;
		};

		if level > max_level {
			continue;
		}

		headings.push(Heading::new(heading_text, level));
	}

	tracing::debug!(count = headings.len(), max_level, "extracted headings");

	headings
}

/// Whether `line` is a fenced code block delimiter.
fn is_fence_line(line: &str) -> bool {
	line.starts_with("```") || line.starts_with("~~~")
}

/// Parse `#{1,6}` + whitespace + content. Returns the level and the trimmed
/// content.
fn parse_atx_heading(line: &str) -> Option<(u8, &str)> {
	let level = line.bytes().take_while(|&byte| byte == b'#').count();
	if level == 0 || level > usize::from(MAX_HEADING_LEVEL) {
		return None;
	}

	let rest = &line[level..];
	if !rest.starts_with(char::is_whitespace) {
		return None;
	}

	let content = rest.trim();
	if content.is_empty() {
		return None;
	}

	Some((level as u8, content))
}
