//! Conversions between the cursor representations hosts use.
//!
//! Targets report cursors as character offsets (Unicode scalar values from
//! the start of the text). Rust strings are indexed by byte, and humans
//! count lines and columns, so these helpers translate between the three.

use serde::Deserialize;
use serde::Serialize;

/// A 1-indexed line and column. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[derive(Serialize, Deserialize)]
pub struct Point {
	pub line: usize,
	pub column: usize,
}

impl Point {
	pub const fn new(line: usize, column: usize) -> Self {
		Self { line, column }
	}
}

/// Byte index of the `char_offset`-th character. Offsets past the end clamp
/// to `text.len()`.
pub fn char_to_byte_offset(text: &str, char_offset: usize) -> usize {
	text.char_indices()
		.nth(char_offset)
		.map_or(text.len(), |(byte_index, _)| byte_index)
}

/// Number of characters before `byte_offset`. Offsets inside a multi-byte
/// character round down to its start; offsets past the end clamp.
pub fn byte_to_char_offset(text: &str, byte_offset: usize) -> usize {
	text.char_indices()
		.take_while(|(byte_index, ch)| byte_index + ch.len_utf8() <= byte_offset)
		.count()
}

/// Convert a 1-indexed point to a character offset. The column may point one
/// past the last character of the line (end of line). Returns `None` when
/// the point is outside the text.
pub fn point_to_char_offset(text: &str, point: Point) -> Option<usize> {
	if point.line == 0 || point.column == 0 {
		return None;
	}

	let mut offset = 0;
	for (index, line) in text.split('\n').enumerate() {
		let line_chars = line.chars().count();
		if index + 1 == point.line {
			if point.column > line_chars + 1 {
				return None;
			}
			return Some(offset + point.column - 1);
		}
		offset += line_chars + 1; // +1 for '\n'
	}

	None
}

/// Convert a character offset to a 1-indexed point. Offsets past the end
/// clamp to the end of the text.
pub fn char_offset_to_point(text: &str, char_offset: usize) -> Point {
	let mut line = 1;
	let mut column = 1;

	for ch in text.chars().take(char_offset) {
		if ch == '\n' {
			line += 1;
			column = 1;
		} else {
			column += 1;
		}
	}

	Point { line, column }
}

/// Replace the characters in `start..end` with `replacement`, in place.
/// Both ends clamp to the end of the text and `end` never precedes `start`.
pub fn splice_chars(text: &mut String, start: usize, end: usize, replacement: &str) {
	let start_byte = char_to_byte_offset(text, start);
	let end_byte = char_to_byte_offset(text, end.max(start));
	text.replace_range(start_byte..end_byte, replacement);
}
