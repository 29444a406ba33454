use crate::position::splice_chars;

/// A host buffer a table of contents can be inserted into.
///
/// Offsets are character offsets (Unicode scalar values) into the buffer
/// that receives the splice. The scanned text may be larger than that buffer,
/// as with a notebook where every markdown cell contributes headings but only
/// the active cell is edited.
pub trait TocTarget {
	/// Whether the target accepts markdown content.
	fn is_markdown(&self) -> bool;

	/// The markdown text to scan for headings.
	fn source_text(&self) -> String;

	/// Current cursor position in the editable buffer.
	fn cursor_offset(&self) -> usize;

	/// Replace `start..end` of the editable buffer with `replacement`. Must be
	/// applied as a single edit.
	fn splice(&mut self, start: usize, end: usize, replacement: &str);
}

/// A single in-memory text buffer with a cursor, like a file editor.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Document {
	pub text: String,
	/// Character offset of the cursor.
	pub cursor: usize,
	pub markdown: bool,
}

impl Document {
	/// A markdown document with the cursor at `cursor`.
	pub fn markdown(text: impl Into<String>, cursor: usize) -> Self {
		Self {
			text: text.into(),
			cursor,
			markdown: true,
		}
	}

	/// Whether a file path looks like markdown by its extension.
	pub fn is_markdown_path(path: &std::path::Path) -> bool {
		path.extension()
			.and_then(|ext| ext.to_str())
			.is_some_and(|ext| {
				matches!(
					ext.to_ascii_lowercase().as_str(),
					"md" | "markdown" | "mdx" | "mkd" | "mdown"
				)
			})
	}
}

impl TocTarget for Document {
	fn is_markdown(&self) -> bool {
		self.markdown
	}

	fn source_text(&self) -> String {
		self.text.clone()
	}

	fn cursor_offset(&self) -> usize {
		self.cursor
	}

	fn splice(&mut self, start: usize, end: usize, replacement: &str) {
		splice_chars(&mut self.text, start, end, replacement);
	}
}
