use serde::Serialize;

use crate::InsertWarning;
use crate::config::TocSettings;
use crate::heading::Heading;
use crate::heading::extract_headings;
use crate::render::render_toc;
use crate::target::TocTarget;

/// Identifier of the insert command, shared by every front end.
pub const INSERT_TOC_COMMAND: &str = "markdown-insert:insert-toc";

/// User facing label of the insert command.
pub const INSERT_TOC_LABEL: &str = "Insert Table of Contents";

/// Short description shown next to the command.
pub const INSERT_TOC_CAPTION: &str = "Insert a table of contents at the cursor position";

/// A successful insertion.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Insertion {
	/// Character offset the table of contents was spliced at.
	pub offset: usize,
	/// The inserted markdown.
	pub text: String,
	pub heading_count: usize,
}

/// Extract headings from `text` and render them with `settings`.
///
/// Returns `None` when there are no headings at or above the configured max
/// level, so callers never insert an empty or caption-only block.
pub fn generate_toc(text: &str, settings: &TocSettings) -> Option<(Vec<Heading>, String)> {
	let headings = extract_headings(text, settings.toc_max_level);
	if headings.is_empty() {
		return None;
	}

	let toc = render_toc(&headings, &settings.toc_caption);
	Some((headings, toc))
}

/// Insert a table of contents at the target's cursor.
///
/// Every precondition failure is returned as an [`InsertWarning`] and leaves
/// the target untouched. On success the rendered block is spliced in exactly
/// once, at `start == end == cursor`.
pub fn insert_toc<T: TocTarget + ?Sized>(
	target: Option<&mut T>,
	settings: &TocSettings,
) -> Result<Insertion, InsertWarning> {
	let Some(target) = target else {
		return Err(warn(InsertWarning::NoActiveTarget));
	};

	if !target.is_markdown() {
		return Err(warn(InsertWarning::NotMarkdown));
	}

	let text = target.source_text();
	let Some((headings, toc)) = generate_toc(&text, settings) else {
		return Err(warn(InsertWarning::NoHeadings));
	};

	let offset = target.cursor_offset();
	target.splice(offset, offset, &toc);

	tracing::debug!(
		offset,
		headings = headings.len(),
		"inserted table of contents"
	);

	Ok(Insertion {
		offset,
		text: toc,
		heading_count: headings.len(),
	})
}

/// Pick the target the command should act on. An open notebook takes
/// precedence over a file editor.
pub fn select_target<'a>(
	notebook: Option<&'a mut dyn TocTarget>,
	editor: Option<&'a mut dyn TocTarget>,
) -> Option<&'a mut dyn TocTarget> {
	notebook.or(editor)
}

fn warn(warning: InsertWarning) -> InsertWarning {
	tracing::warn!("{warning}");
	warning
}
