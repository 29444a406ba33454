use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::MdtocError;
use crate::MdtocResult;
use crate::position::splice_chars;
use crate::target::TocTarget;

/// The type of a notebook cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
	Markdown,
	Code,
	Raw,
}

impl CellKind {
	fn from_cell_type(cell_type: &str) -> Self {
		match cell_type {
			"markdown" => Self::Markdown,
			"code" => Self::Code,
			_ => Self::Raw,
		}
	}

	fn as_cell_type(self) -> &'static str {
		match self {
			Self::Markdown => "markdown",
			Self::Code => "code",
			Self::Raw => "raw",
		}
	}
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Cell {
	pub kind: CellKind,
	pub source: String,
	/// Character offset of the cursor within `source`.
	pub cursor: usize,
}

impl Cell {
	pub fn new(kind: CellKind, source: impl Into<String>) -> Self {
		Self {
			kind,
			source: source.into(),
			cursor: 0,
		}
	}

	pub fn markdown(source: impl Into<String>) -> Self {
		Self::new(CellKind::Markdown, source)
	}

	pub fn code(source: impl Into<String>) -> Self {
		Self::new(CellKind::Code, source)
	}
}

/// A notebook: an ordered list of cells with one optionally active.
///
/// As a [`TocTarget`], headings are collected from every markdown cell but
/// the table of contents is spliced into the active cell only.
#[derive(Debug, Clone, Default)]
pub struct Notebook {
	pub cells: Vec<Cell>,
	pub active: Option<usize>,
	/// The parsed `.ipynb` document, kept so a save preserves metadata,
	/// outputs and other fields this crate never reads.
	raw: Option<Value>,
}

impl Notebook {
	pub fn new(cells: Vec<Cell>) -> Self {
		Self {
			cells,
			active: None,
			raw: None,
		}
	}

	/// Make `index` the active cell.
	pub fn with_active(mut self, index: usize) -> MdtocResult<Self> {
		self.set_active(index)?;
		Ok(self)
	}

	pub fn set_active(&mut self, index: usize) -> MdtocResult<()> {
		if index >= self.cells.len() {
			return Err(MdtocError::MissingCell {
				index,
				count: self.cells.len(),
			});
		}
		self.active = Some(index);
		Ok(())
	}

	pub fn active_cell(&self) -> Option<&Cell> {
		self.active.and_then(|index| self.cells.get(index))
	}

	pub fn active_cell_mut(&mut self) -> Option<&mut Cell> {
		self.active.and_then(|index| self.cells.get_mut(index))
	}

	/// Index of the first markdown cell, if any.
	pub fn first_markdown_cell(&self) -> Option<usize> {
		self.cells
			.iter()
			.position(|cell| cell.kind == CellKind::Markdown)
	}

	/// The text scanned for headings: every markdown cell's source followed
	/// by a blank line, in cell order.
	pub fn markdown_text(&self) -> String {
		let mut text = String::new();
		for cell in self.cells.iter().filter(|cell| cell.kind == CellKind::Markdown) {
			text.push_str(&cell.source);
			text.push_str("\n\n");
		}
		text
	}

	/// Parse an nbformat 4 `.ipynb` document. Cell sources may be a string or
	/// an array of lines.
	pub fn from_ipynb(content: &str) -> MdtocResult<Self> {
		let raw: Value =
			serde_json::from_str(content).map_err(|e| MdtocError::Notebook(e.to_string()))?;

		let Some(cells_json) = raw.get("cells").and_then(Value::as_array) else {
			return Err(MdtocError::Notebook("missing `cells` array".to_string()));
		};

		let mut cells = Vec::with_capacity(cells_json.len());
		for (index, cell) in cells_json.iter().enumerate() {
			let kind = cell
				.get("cell_type")
				.and_then(Value::as_str)
				.map_or(CellKind::Raw, CellKind::from_cell_type);
			let source = match cell.get("source") {
				Some(Value::String(source)) => source.clone(),
				Some(Value::Array(lines)) => {
					let mut source = String::new();
					for line in lines {
						let Some(line) = line.as_str() else {
							return Err(MdtocError::Notebook(format!(
								"cell {index} has a non-string source line"
							)));
						};
						source.push_str(line);
					}
					source
				}
				None | Some(Value::Null) => String::new(),
				Some(_) => {
					return Err(MdtocError::Notebook(format!(
						"cell {index} has an invalid `source` field"
					)));
				}
			};

			cells.push(Cell::new(kind, source));
		}

		Ok(Self {
			cells,
			active: None,
			raw: Some(raw),
		})
	}

	/// Serialize back to `.ipynb` JSON with Jupyter's one-space indentation.
	/// Cell sources are written as arrays of lines.
	pub fn to_ipynb(&self) -> MdtocResult<String> {
		let mut document = self.raw.clone().unwrap_or_else(|| {
			serde_json::json!({
				"cells": [],
				"metadata": {},
				"nbformat": 4,
				"nbformat_minor": 5,
			})
		});

		let cells_json = document
			.get_mut("cells")
			.and_then(Value::as_array_mut)
			.ok_or_else(|| MdtocError::Notebook("missing `cells` array".to_string()))?;

		for (index, cell) in self.cells.iter().enumerate() {
			let lines: Vec<Value> = cell
				.source
				.split_inclusive('\n')
				.map(|line| Value::String(line.to_string()))
				.collect();

			if let Some(existing) = cells_json.get_mut(index).and_then(Value::as_object_mut) {
				existing.insert("source".to_string(), Value::Array(lines));
			} else {
				cells_json.push(new_cell_json(cell.kind, lines));
			}
		}
		cells_json.truncate(self.cells.len());

		let mut output = Vec::new();
		let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
		let mut serializer = serde_json::Serializer::with_formatter(&mut output, formatter);
		document
			.serialize(&mut serializer)
			.map_err(|e| MdtocError::Notebook(e.to_string()))?;

		let mut output =
			String::from_utf8(output).map_err(|e| MdtocError::Notebook(e.to_string()))?;
		output.push('\n');
		Ok(output)
	}
}

fn new_cell_json(kind: CellKind, lines: Vec<Value>) -> Value {
	let mut cell = serde_json::json!({
		"cell_type": kind.as_cell_type(),
		"metadata": {},
		"source": lines,
	});

	if kind == CellKind::Code {
		cell["execution_count"] = Value::Null;
		cell["outputs"] = Value::Array(Vec::new());
	}

	cell
}

impl TocTarget for Notebook {
	fn is_markdown(&self) -> bool {
		self.active_cell()
			.is_some_and(|cell| cell.kind == CellKind::Markdown)
	}

	fn source_text(&self) -> String {
		self.markdown_text()
	}

	fn cursor_offset(&self) -> usize {
		self.active_cell().map_or(0, |cell| cell.cursor)
	}

	fn splice(&mut self, start: usize, end: usize, replacement: &str) {
		if let Some(cell) = self.active_cell_mut() {
			splice_chars(&mut cell.source, start, end, replacement);
		}
	}
}
