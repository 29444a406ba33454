use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use mdtoc_cli::Commands;
use mdtoc_cli::HeadingsFormat;
use mdtoc_cli::MdtocCli;
use mdtoc_core::AnyEmptyResult;
use mdtoc_core::CONFIG_FILE_CANDIDATES;
use mdtoc_core::Document;
use mdtoc_core::InsertWarning;
use mdtoc_core::MdtocError;
use mdtoc_core::MdtocResult;
use mdtoc_core::Notebook;
use mdtoc_core::Point;
use mdtoc_core::SAMPLE_CONFIG;
use mdtoc_core::TocSettings;
use mdtoc_core::TocTarget;
use mdtoc_core::extract_headings;
use mdtoc_core::generate_toc;
use mdtoc_core::insert_toc;
use mdtoc_core::point_to_char_offset;
use mdtoc_core::select_target;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,dimmed) => {
		if color_enabled() {
			format!("{}", $text.dimmed())
		} else {
			format!("{}", $text)
		}
	};
}

/// Where the cursor was placed on the command line.
#[derive(Debug, Clone, Copy, Default)]
struct CursorArg {
	offset: Option<usize>,
	point: Option<Point>,
}

fn main() {
	let args = MdtocCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Insert {
			file,
			offset,
			line,
			column,
			cell,
			dry_run,
		}) => {
			let cursor = CursorArg {
				offset: *offset,
				point: line.zip(*column).map(|(line, column)| Point::new(line, column)),
			};
			run_insert(&args, file, cursor, *cell, *dry_run)
		}
		Some(Commands::Headings { file, format }) => run_headings(&args, file, *format),
		Some(Commands::Render { file }) => run_render(&args, file),
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Lsp) => run_lsp(),
		None => {
			eprintln!("No subcommand specified. Run `mdtoc --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<MdtocError>() {
			Ok(mdtoc_err) => {
				let report: miette::Report = (*mdtoc_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr so stdout stays clean for command output and the LSP
/// transport. `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_directive = if verbose { "debug" } else { "error" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.without_time()
		.try_init()
		.ok();
}

fn resolve_root(args: &MdtocCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Settings from the discovered config file with command line overrides
/// applied on top.
fn load_settings(args: &MdtocCli) -> MdtocResult<TocSettings> {
	let root = resolve_root(args);
	TocSettings::load_or_default(&root).with_overrides(args.caption.clone(), args.max_level)
}

fn is_notebook_path(path: &Path) -> bool {
	path.extension().is_some_and(|ext| ext == "ipynb")
}

/// The markdown a file contributes to the table of contents: the whole file,
/// or every markdown cell of a notebook.
fn read_markdown_text(file: &Path) -> MdtocResult<String> {
	let content = std::fs::read_to_string(file)?;
	if is_notebook_path(file) {
		Ok(Notebook::from_ipynb(&content)?.markdown_text())
	} else {
		Ok(content)
	}
}

/// Character offset of the cursor within `text`. Offsets past the end clamp
/// to the end; line/column points must exist.
fn resolve_cursor(text: &str, cursor: CursorArg) -> MdtocResult<usize> {
	if let Some(point) = cursor.point {
		return point_to_char_offset(text, point).ok_or(MdtocError::InvalidPosition {
			line: point.line,
			column: point.column,
		});
	}

	Ok(cursor.offset.unwrap_or(0).min(text.chars().count()))
}

fn print_warning(warning: InsertWarning) {
	let report = miette::Report::new(warning);
	eprintln!("{report:?}");
}

fn run_insert(
	args: &MdtocCli,
	file: &Path,
	cursor: CursorArg,
	cell: Option<usize>,
	dry_run: bool,
) -> AnyEmptyResult {
	let settings = load_settings(args)?;
	let content = std::fs::read_to_string(file)?;

	let mut notebook = None;
	let mut document = None;

	if is_notebook_path(file) {
		let mut parsed = Notebook::from_ipynb(&content)?;
		if let Some(index) = cell.or_else(|| parsed.first_markdown_cell()) {
			parsed.set_active(index)?;
		}
		if let Some(active) = parsed.active_cell_mut() {
			active.cursor = resolve_cursor(&active.source, cursor)?;
		}
		notebook = Some(parsed);
	} else {
		if cell.is_some() {
			eprintln!(
				"{} `--cell` only applies to notebooks, ignoring",
				colored!("warning:", yellow)
			);
		}
		document = Some(Document {
			cursor: resolve_cursor(&content, cursor)?,
			markdown: Document::is_markdown_path(file),
			text: content.clone(),
		});
	}

	let target = select_target(
		notebook.as_mut().map(|nb| nb as &mut dyn TocTarget),
		document.as_mut().map(|doc| doc as &mut dyn TocTarget),
	);

	let insertion = match insert_toc(target, &settings) {
		Ok(insertion) => insertion,
		Err(warning) => {
			print_warning(warning);
			return Ok(());
		}
	};

	let updated = match (&notebook, document) {
		(Some(notebook), _) => notebook.to_ipynb()?,
		(None, Some(document)) => document.text,
		(None, None) => return Ok(()),
	};

	if dry_run {
		println!(
			"Dry run: would insert a table of contents with {} heading(s) into {}:",
			insertion.heading_count,
			file.display()
		);
		print_diff(&content, &updated);
		return Ok(());
	}

	std::fs::write(file, updated)?;
	println!(
		"{} table of contents with {} heading(s) into {}",
		colored!("Inserted", green),
		insertion.heading_count,
		file.display()
	);

	Ok(())
}

fn run_headings(args: &MdtocCli, file: &Path, format: HeadingsFormat) -> AnyEmptyResult {
	let settings = load_settings(args)?;
	let text = read_markdown_text(file)?;
	let headings = extract_headings(&text, settings.toc_max_level);

	match format {
		HeadingsFormat::Json => {
			println!("{}", serde_json::to_string_pretty(&headings)?);
		}
		HeadingsFormat::Text => {
			if headings.is_empty() {
				eprintln!("No headings found in {}", file.display());
			}
			for heading in &headings {
				let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
				let hashes = "#".repeat(usize::from(heading.level));
				println!(
					"{indent}{hashes} {} {}",
					heading.text,
					colored!(format!("#{}", heading.id), dimmed)
				);
			}
		}
	}

	Ok(())
}

fn run_render(args: &MdtocCli, file: &Path) -> AnyEmptyResult {
	let settings = load_settings(args)?;
	let text = read_markdown_text(file)?;

	match generate_toc(&text, &settings) {
		Some((_, toc)) => print!("{toc}"),
		None => print_warning(InsertWarning::NoHeadings),
	}

	Ok(())
}

fn run_init(args: &MdtocCli) -> AnyEmptyResult {
	let root = resolve_root(args);

	if let Some(existing) = TocSettings::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let config_path = root.join(CONFIG_FILE_CANDIDATES[0]);
	std::fs::write(&config_path, SAMPLE_CONFIG)?;
	println!("{} {}", colored!("Created", green), config_path.display());

	Ok(())
}

fn run_lsp() -> AnyEmptyResult {
	let rt = tokio::runtime::Runtime::new()?;
	rt.block_on(mdtoc_lsp::run_server());
	Ok(())
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, updated: &str) {
	let diff = TextDiff::from_lines(current, updated);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				print!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				print!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				print!("   {change}");
			}
		}
	}
}
