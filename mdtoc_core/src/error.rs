use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum MdtocError {
	#[error(transparent)]
	#[diagnostic(code(mdtoc::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(mdtoc::config_parse),
		help("check that mdtoc.toml is valid TOML with `toc_caption` and/or `toc_max_level` keys")
	)]
	ConfigParse(String),

	#[error("invalid settings: {0}")]
	#[diagnostic(code(mdtoc::settings))]
	Settings(String),

	#[error("toc max level must be between 1 and 6, got {0}")]
	#[diagnostic(
		code(mdtoc::invalid_max_level),
		help("set `toc_max_level` to a heading depth from 1 (`#`) to 6 (`######`)")
	)]
	InvalidMaxLevel(i64),

	#[error("failed to read notebook: {0}")]
	#[diagnostic(
		code(mdtoc::notebook),
		help("notebooks must be nbformat 4 JSON documents with a `cells` array")
	)]
	Notebook(String),

	#[error("cell {index} does not exist (notebook has {count} cell(s))")]
	#[diagnostic(code(mdtoc::missing_cell))]
	MissingCell { index: usize, count: usize },

	#[error("cursor position {line}:{column} is outside the document")]
	#[diagnostic(
		code(mdtoc::invalid_position),
		help("lines and columns are 1-indexed")
	)]
	InvalidPosition { line: usize, column: usize },
}

/// A non-fatal precondition failure of the insert command. The target is
/// never modified when one of these is returned.
#[derive(Debug, Clone, Copy, Diagnostic, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum InsertWarning {
	#[error("no active markdown editor or notebook")]
	#[diagnostic(code(mdtoc::no_active_target), severity(Warning))]
	NoActiveTarget,

	#[error("active target is not a markdown document or markdown cell")]
	#[diagnostic(
		code(mdtoc::not_markdown),
		severity(Warning),
		help("move the cursor into a markdown cell or open a markdown file")
	)]
	NotMarkdown,

	#[error("no headings found in document")]
	#[diagnostic(
		code(mdtoc::no_headings),
		severity(Warning),
		help("headings deeper than the configured max level are not included")
	)]
	NoHeadings,
}

pub type MdtocResult<T> = Result<T, MdtocError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
