mod common;

use clap::Parser;
use common::README;
use mdtoc_cli::Commands;
use mdtoc_cli::MdtocCli;
use mdtoc_core::AnyEmptyResult;
use serde_json::Value;
use serde_json::json;
use similar_asserts::assert_eq;

const README_TOC: &str =
	"## Table of Contents\n\n- [Title](#Title)\n  - [Install](#Install)\n  - [Usage](#Usage)\n\n";

#[test]
fn insert_at_start_of_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let readme = tmp.path().join("readme.md");
	std::fs::write(&readme, README)?;

	common::mdtoc_cmd()
		.arg("insert")
		.arg(&readme)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Inserted table of contents with 3 heading(s)"));

	let content = std::fs::read_to_string(&readme)?;
	assert_eq!(content, format!("{README_TOC}{README}"));

	Ok(())
}

#[test]
fn insert_at_line_and_column() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let readme = tmp.path().join("readme.md");
	std::fs::write(&readme, README)?;

	common::mdtoc_cmd()
		.arg("insert")
		.arg(&readme)
		.args(["--line", "3", "--column", "1"])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let content = std::fs::read_to_string(&readme)?;
	let (before, after) = README.split_at("# Title\n\n".len());
	assert_eq!(content, format!("{before}{README_TOC}{after}"));

	Ok(())
}

#[test]
fn insert_at_character_offset() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let readme = tmp.path().join("readme.md");
	std::fs::write(&readme, "# Café\n\nText.\n")?;

	common::mdtoc_cmd()
		.arg("insert")
		.arg(&readme)
		.args(["--offset", "8"])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let content = std::fs::read_to_string(&readme)?;
	assert_eq!(
		content,
		"# Café\n\n## Table of Contents\n\n- [Café](#Café)\n\nText.\n"
	);

	Ok(())
}

#[test]
fn insert_twice_lists_previous_caption() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let readme = tmp.path().join("readme.md");
	std::fs::write(&readme, "# Only\n")?;

	for _ in 0..2 {
		common::mdtoc_cmd()
			.arg("insert")
			.arg(&readme)
			.arg("--path")
			.arg(tmp.path())
			.assert()
			.success();
	}

	let content = std::fs::read_to_string(&readme)?;
	assert!(
		content.starts_with(
			"## Table of Contents\n\n  - [Table of Contents](#Table-of-Contents)\n- \
			 [Only](#Only)\n\n"
		),
		"unexpected content: {content}"
	);

	Ok(())
}

#[test]
fn insert_dry_run_prints_diff_without_writing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let readme = tmp.path().join("readme.md");
	std::fs::write(&readme, README)?;

	common::mdtoc_cmd()
		.arg("insert")
		.arg(&readme)
		.arg("--dry-run")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Dry run"))
		.stdout(predicates::str::contains("+- [Title](#Title)"))
		.stdout(predicates::str::contains("+  - [Usage](#Usage)"));

	assert_eq!(std::fs::read_to_string(&readme)?, README);

	Ok(())
}

#[test]
fn insert_without_headings_warns_and_leaves_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let readme = tmp.path().join("readme.md");
	let original = "Just text.\n\n```\n# fenced\n```\n";
	std::fs::write(&readme, original)?;

	common::mdtoc_cmd()
		.arg("insert")
		.arg(&readme)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("no headings found in document"));

	assert_eq!(std::fs::read_to_string(&readme)?, original);

	Ok(())
}

#[test]
fn insert_into_non_markdown_file_warns() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let notes = tmp.path().join("notes.txt");
	std::fs::write(&notes, "# Heading\n")?;

	common::mdtoc_cmd()
		.arg("insert")
		.arg(&notes)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("not a markdown document"));

	assert_eq!(std::fs::read_to_string(&notes)?, "# Heading\n");

	Ok(())
}

#[test]
fn insert_outside_document_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let readme = tmp.path().join("readme.md");
	std::fs::write(&readme, README)?;

	common::mdtoc_cmd()
		.arg("insert")
		.arg(&readme)
		.args(["--line", "99", "--column", "1"])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("outside the document"));

	assert_eq!(std::fs::read_to_string(&readme)?, README);

	Ok(())
}

#[test]
fn insert_missing_file_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::mdtoc_cmd()
		.arg("insert")
		.arg(tmp.path().join("missing.md"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2);

	Ok(())
}

fn sample_notebook() -> String {
	json!({
		"cells": [
			{ "cell_type": "markdown", "metadata": {}, "source": ["# Notebook\n", "\n", "Intro."] },
			{
				"cell_type": "code",
				"execution_count": 1,
				"metadata": {},
				"outputs": [],
				"source": ["print('# not a heading')"]
			},
			{ "cell_type": "markdown", "metadata": { "tags": ["keep"] }, "source": "## Section\n" }
		],
		"metadata": { "kernelspec": { "name": "python3" } },
		"nbformat": 4,
		"nbformat_minor": 5
	})
	.to_string()
}

fn cell_source(notebook: &Value, index: usize) -> String {
	notebook["cells"][index]["source"]
		.as_array()
		.map(|lines| lines.iter().filter_map(Value::as_str).collect())
		.unwrap_or_default()
}

#[test]
fn insert_into_first_markdown_cell_of_notebook() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let path = tmp.path().join("analysis.ipynb");
	std::fs::write(&path, sample_notebook())?;

	common::mdtoc_cmd()
		.arg("insert")
		.arg(&path)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let notebook: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
	assert_eq!(
		cell_source(&notebook, 0),
		"## Table of Contents\n\n- [Notebook](#Notebook)\n  - [Section](#Section)\n\n# \
		 Notebook\n\nIntro."
	);
	assert_eq!(cell_source(&notebook, 2), "## Section\n");
	assert_eq!(notebook["cells"][2]["metadata"]["tags"][0], json!("keep"));
	assert_eq!(notebook["metadata"]["kernelspec"]["name"], json!("python3"));

	Ok(())
}

#[test]
fn insert_into_selected_notebook_cell() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let path = tmp.path().join("analysis.ipynb");
	std::fs::write(&path, sample_notebook())?;

	common::mdtoc_cmd()
		.arg("insert")
		.arg(&path)
		.args(["--cell", "2", "--offset", "100"])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let notebook: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
	assert_eq!(cell_source(&notebook, 0), "# Notebook\n\nIntro.");
	assert_eq!(
		cell_source(&notebook, 2),
		"## Section\n## Table of Contents\n\n- [Notebook](#Notebook)\n  - [Section](#Section)\n\n"
	);

	Ok(())
}

#[test]
fn insert_into_code_cell_warns() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let path = tmp.path().join("analysis.ipynb");
	let original = sample_notebook();
	std::fs::write(&path, &original)?;

	common::mdtoc_cmd()
		.arg("insert")
		.arg(&path)
		.args(["--cell", "1"])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("not a markdown document or markdown cell"));

	assert_eq!(std::fs::read_to_string(&path)?, original);

	Ok(())
}

#[test]
fn insert_into_missing_notebook_cell_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let path = tmp.path().join("analysis.ipynb");
	std::fs::write(&path, sample_notebook())?;

	common::mdtoc_cmd()
		.arg("insert")
		.arg(&path)
		.args(["--cell", "7"])
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("cell 7 does not exist"));

	Ok(())
}

#[test]
fn insert_into_invalid_notebook_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let path = tmp.path().join("broken.ipynb");
	std::fs::write(&path, "{ not json")?;

	common::mdtoc_cmd()
		.arg("insert")
		.arg(&path)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to read notebook"));

	Ok(())
}

#[test]
fn offset_conflicts_with_line_and_column() {
	let result = MdtocCli::try_parse_from([
		"mdtoc", "insert", "readme.md", "--offset", "3", "--line", "1", "--column", "1",
	]);

	assert!(result.is_err());
}

#[test]
fn line_requires_column() {
	let result = MdtocCli::try_parse_from(["mdtoc", "insert", "readme.md", "--line", "2"]);

	assert!(result.is_err());
}

#[test]
fn parses_insert_arguments() -> AnyEmptyResult {
	let cli = MdtocCli::try_parse_from([
		"mdtoc",
		"insert",
		"nb.ipynb",
		"--cell",
		"3",
		"--dry-run",
		"--max-level",
		"2",
	])?;

	let Some(Commands::Insert {
		cell,
		dry_run,
		offset,
		..
	}) = cli.command
	else {
		panic!("expected the insert command");
	};
	assert_eq!(cell, Some(3));
	assert!(dry_run);
	assert_eq!(offset, None);
	assert_eq!(cli.max_level, Some(2));

	Ok(())
}
