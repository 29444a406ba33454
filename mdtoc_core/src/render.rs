use crate::heading::Heading;

/// Render headings as a nested markdown bullet list of anchor links.
///
/// Each heading is indented by two spaces per level below `1` and rendered
/// as `- [text](#id)`. A non-empty `caption` is inserted verbatim, followed by
/// a blank line. The result always ends with `"\n\n"` so it stays separated
/// from whatever follows the insertion point.
pub fn render_toc(headings: &[Heading], caption: &str) -> String {
	let mut output = String::new();

	if !caption.is_empty() {
		output.push_str(caption);
		output.push_str("\n\n");
	}

	let lines: Vec<String> = headings
		.iter()
		.map(|heading| {
			let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
			format!("{indent}- [{}](#{})", heading.text, heading.id)
		})
		.collect();

	output.push_str(&lines.join("\n"));
	output.push_str("\n\n");
	output
}
