use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Insert a linked table of contents into markdown files and notebook cells.",
	long_about = "mdtoc scans markdown for ATX headings (skipping fenced code blocks) and \
	              inserts a nested list of links to them at a cursor position.\n\nAnchors \
	              match the ids JupyterLab assigns to rendered headings, so the links work in \
	              notebooks as well as plain markdown files.\n\nQuick start:\n  mdtoc init      \
	              Create an mdtoc.toml\n  mdtoc render    Preview the table of contents\n  \
	              mdtoc insert    Insert it into a file"
)]
pub struct MdtocCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory, where `mdtoc.toml` is discovered.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,

	/// Override the caption inserted above the list. Pass an empty string to
	/// omit it.
	#[arg(long, global = true)]
	pub caption: Option<String>,

	/// Override the deepest heading level (1-6) included in the list.
	#[arg(long, global = true)]
	pub max_level: Option<u8>,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Insert a table of contents into a markdown file or notebook.
	///
	/// The cursor defaults to the start of the file. Use `--offset` for a
	/// character offset or `--line` and `--column` (1-indexed) for a
	/// position.
	///
	/// For `.ipynb` notebooks, headings are collected from every markdown
	/// cell and the table of contents is inserted into the cell selected with
	/// `--cell` (default: the first markdown cell). The cursor is relative to
	/// that cell's source.
	///
	/// Files without headings, or a selected cell that is not markdown, are
	/// left untouched and a warning is printed.
	#[command(about = mdtoc_core::INSERT_TOC_CAPTION)]
	Insert {
		/// The markdown file or `.ipynb` notebook to update.
		file: PathBuf,

		/// Character offset of the cursor.
		#[arg(long, conflicts_with_all = ["line", "column"])]
		offset: Option<usize>,

		/// 1-indexed cursor line.
		#[arg(long, requires = "column")]
		line: Option<usize>,

		/// 1-indexed cursor column, counted in characters.
		#[arg(long, requires = "line")]
		column: Option<usize>,

		/// Zero-based index of the notebook cell to insert into.
		#[arg(long)]
		cell: Option<usize>,

		/// Preview the change as a diff without writing the file.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// List the headings that would appear in the table of contents.
	Headings {
		/// The markdown file or `.ipynb` notebook to scan.
		file: PathBuf,

		/// Output format. Use `text` for human-readable output or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = HeadingsFormat::Text)]
		format: HeadingsFormat,
	},
	/// Print the table of contents that `insert` would add.
	Render {
		/// The markdown file or `.ipynb` notebook to scan.
		file: PathBuf,
	},
	/// Create a sample `mdtoc.toml` in the project root.
	///
	/// If a config file already exists, this command is a no-op and exits
	/// successfully.
	Init,
	/// Start the mdtoc language server (LSP).
	///
	/// Communicates over stdin/stdout using the Language Server Protocol.
	/// Markdown documents get an "Insert Table of Contents" code action and
	/// the `markdown-insert:insert-toc` command.
	Lsp,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HeadingsFormat {
	/// Human-readable outline with anchors.
	Text,
	/// JSON array of `{ text, level, id }` objects.
	Json,
}
