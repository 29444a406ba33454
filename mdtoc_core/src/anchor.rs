/// The decoration some renderers append to heading text as a permalink.
pub const PILCROW: char = '¶';

/// Generate the anchor fragment JupyterLab assigns to a heading.
///
/// Trailing pilcrows (and any whitespace around them) are dropped, the text
/// is trimmed, and every run of whitespace becomes a single `-`. Case,
/// digits and punctuation are kept exactly as written, so
/// `"CPL-1: User Experience"` becomes `"CPL-1:-User-Experience"`.
///
/// Links built from these ids must resolve against the anchors the renderer
/// produces itself, so any divergence from its algorithm breaks navigation.
pub fn slugify(text: impl AsRef<str>) -> String {
	let cleaned = text
		.as_ref()
		.trim_end_matches(|c: char| c == PILCROW || c.is_whitespace())
		.trim_start();

	let mut slug = String::with_capacity(cleaned.len());
	for (index, word) in cleaned.split_whitespace().enumerate() {
		if index > 0 {
			slug.push('-');
		}
		slug.push_str(word);
	}

	slug
}
