use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use mdtoc_core::Document;
use mdtoc_core::INSERT_TOC_COMMAND;
use mdtoc_core::INSERT_TOC_LABEL;
use mdtoc_core::InsertWarning;
use mdtoc_core::TocSettings;
use mdtoc_core::TocTarget;
use mdtoc_core::byte_to_char_offset;
use mdtoc_core::insert_toc;
use serde_json::Value;
use tokio::sync::RwLock;
use tower_lsp_server::Client;
use tower_lsp_server::LanguageServer;
use tower_lsp_server::jsonrpc::Result as LspResult;
use tower_lsp_server::ls_types::*;

/// State for a single open document.
#[derive(Debug, Clone)]
struct DocumentState {
	/// The full text content of the document.
	content: String,
	/// Whether the client reported the document as markdown (by language id
	/// or file extension).
	markdown: bool,
}

/// Workspace-level state shared across all LSP requests.
#[derive(Debug, Default)]
struct WorkspaceState {
	/// The workspace root path, used to discover `mdtoc.toml`.
	root: Option<PathBuf>,
	/// Open documents keyed by URI.
	documents: HashMap<Uri, DocumentState>,
	/// Current settings snapshot. Replaced wholesale on every update.
	settings: TocSettings,
}

impl WorkspaceState {
	/// Reload settings from the config file in the workspace root, falling
	/// back to defaults.
	fn reload_config(&mut self) {
		self.settings = match &self.root {
			Some(root) => TocSettings::load_or_default(root),
			None => TocSettings::default(),
		};
	}

	/// Replace settings from a client payload (`initializationOptions` or
	/// `workspace/didChangeConfiguration`). Invalid payloads are logged and
	/// reset the settings to their defaults.
	fn apply_client_settings(&mut self, payload: &Value) {
		self.settings = TocSettings::from_json(payload).unwrap_or_else(|e| {
			tracing::error!(error = %e, "failed to load client settings, using defaults");
			TocSettings::default()
		});
	}
}

/// Whether a document is markdown, judged by the client's language id or
/// the URI's file extension.
fn is_markdown_document(uri: &Uri, language_id: Option<&str>) -> bool {
	if language_id.is_some_and(|id| matches!(id, "markdown" | "mdx")) {
		return true;
	}

	Document::is_markdown_path(Path::new(uri.path().as_str()))
}

/// Convert an LSP `Position` (0-indexed line, character in UTF-16 code units)
/// to a byte offset within `content`. Returns `None` if the position is out of
/// bounds.
fn lsp_position_to_offset(content: &str, position: Position) -> Option<usize> {
	let mut offset = 0;
	for (i, line) in content.split('\n').enumerate() {
		if i == position.line as usize {
			// LSP character offsets are in UTF-16 code units, so we need to
			// walk the line converting from UTF-16 units to byte indices.
			let mut utf16_offset = 0u32;
			for (byte_idx, c) in line.char_indices() {
				if utf16_offset == position.character {
					return Some(offset + byte_idx);
				}
				utf16_offset += c.len_utf16() as u32;
			}
			// Position at end of line (past last character).
			if utf16_offset == position.character {
				return Some(offset + line.len());
			}
			return None;
		}
		offset += line.len() + 1; // +1 for '\n'
	}
	None
}

/// Replace `range` of `content` with `text`. Ranges that fall outside the
/// document or end before they start are ignored.
fn apply_range_change(content: &mut String, range: Range, text: &str) {
	let start = lsp_position_to_offset(content, range.start);
	let end = lsp_position_to_offset(content, range.end);
	match (start, end) {
		(Some(start), Some(end)) if start <= end => content.replace_range(start..end, text),
		_ => {
			tracing::debug!(?range, "ignoring invalid content change range");
		}
	}
}

/// Convert a character offset within `content` to an LSP `Position`.
/// Offsets past the end clamp to the end of the document.
fn char_offset_to_lsp_position(content: &str, char_offset: usize) -> Position {
	let mut line = 0u32;
	let mut character = 0u32;
	for c in content.chars().take(char_offset) {
		if c == '\n' {
			line += 1;
			character = 0;
		} else {
			character += c.len_utf16() as u32;
		}
	}
	Position { line, character }
}

/// An open document seen through the [`TocTarget`] interface. Splices are
/// recorded as a `TextEdit` for the client to apply rather than performed
/// locally, so the server's copy only changes when the client echoes the
/// edit back through `didChange`.
struct EditTarget<'a> {
	doc: &'a DocumentState,
	cursor: usize,
	edit: Option<TextEdit>,
}

impl<'a> EditTarget<'a> {
	fn new(doc: &'a DocumentState, position: Position) -> Self {
		let byte_offset = lsp_position_to_offset(&doc.content, position).unwrap_or(doc.content.len());
		Self {
			doc,
			cursor: byte_to_char_offset(&doc.content, byte_offset),
			edit: None,
		}
	}
}

impl TocTarget for EditTarget<'_> {
	fn is_markdown(&self) -> bool {
		self.doc.markdown
	}

	fn source_text(&self) -> String {
		self.doc.content.clone()
	}

	fn cursor_offset(&self) -> usize {
		self.cursor
	}

	fn splice(&mut self, start: usize, end: usize, replacement: &str) {
		self.edit = Some(TextEdit {
			range: Range {
				start: char_offset_to_lsp_position(&self.doc.content, start),
				end: char_offset_to_lsp_position(&self.doc.content, end),
			},
			new_text: replacement.to_string(),
		});
	}
}

/// Compute the workspace edit inserting a table of contents into `uri` at
/// `position`. A document the server has not seen counts as no active
/// target.
fn compute_insert_edit(
	state: &WorkspaceState,
	uri: &Uri,
	position: Position,
) -> Result<WorkspaceEdit, InsertWarning> {
	let mut target = state
		.documents
		.get(uri)
		.map(|doc| EditTarget::new(doc, position));

	insert_toc(target.as_mut(), &state.settings)?;

	let edits: Vec<TextEdit> = target.and_then(|target| target.edit).into_iter().collect();
	let mut changes = HashMap::new();
	changes.insert(uri.clone(), edits);

	Ok(WorkspaceEdit {
		changes: Some(changes),
		..Default::default()
	})
}

/// Offer "Insert Table of Contents" at the start of the requested range when
/// the document is markdown and has headings to list.
fn compute_code_actions(
	state: &WorkspaceState,
	uri: &Uri,
	range: Range,
) -> Vec<CodeActionOrCommand> {
	let edit = match compute_insert_edit(state, uri, range.start) {
		Ok(edit) => edit,
		Err(warning) => {
			tracing::debug!(%warning, "not offering table of contents action");
			return Vec::new();
		}
	};

	vec![CodeActionOrCommand::CodeAction(CodeAction {
		title: INSERT_TOC_LABEL.to_string(),
		kind: Some(CodeActionKind::REFACTOR),
		edit: Some(edit),
		..Default::default()
	})]
}

/// Parse `[uri, position]` command arguments.
fn parse_command_arguments(arguments: &[Value]) -> Option<(Uri, Position)> {
	let uri = serde_json::from_value(arguments.first()?.clone()).ok()?;
	let position = arguments
		.get(1)
		.and_then(|value| serde_json::from_value(value.clone()).ok())
		.unwrap_or_default();
	Some((uri, position))
}

/// The mdtoc language server.
#[derive(Debug)]
pub struct MdtocLanguageServer {
	client: Client,
	state: RwLock<WorkspaceState>,
}

impl MdtocLanguageServer {
	pub fn new(client: Client) -> Self {
		Self {
			client,
			state: RwLock::new(WorkspaceState::default()),
		}
	}

	async fn on_document_change(&self, uri: Uri, content: String, language_id: Option<&str>) {
		let mut state = self.state.write().await;
		let markdown = match (language_id, state.documents.get(&uri)) {
			(None, Some(existing)) => existing.markdown,
			_ => is_markdown_document(&uri, language_id),
		};
		state
			.documents
			.insert(uri, DocumentState { content, markdown });
	}

	/// Run the insert command and ask the client to apply the edit.
	async fn run_insert_command(&self, arguments: &[Value]) {
		let result = match parse_command_arguments(arguments) {
			Some((uri, position)) => {
				let state = self.state.read().await;
				compute_insert_edit(&state, &uri, position)
			}
			None => Err(InsertWarning::NoActiveTarget),
		};

		match result {
			Ok(edit) => {
				if let Err(e) = self.client.apply_edit(edit).await {
					tracing::error!(error = %e, "client failed to apply table of contents edit");
				}
			}
			Err(warning) => {
				tracing::warn!(%warning, "table of contents not inserted");
				self.client
					.show_message(MessageType::WARNING, warning.to_string())
					.await;
			}
		}
	}
}

impl LanguageServer for MdtocLanguageServer {
	async fn initialize(&self, params: InitializeParams) -> LspResult<InitializeResult> {
		// Determine workspace root — prefer `workspace_folders` (modern LSP),
		// fall back to the deprecated `root_uri` for older clients.
		let root = params
			.workspace_folders
			.as_ref()
			.and_then(|folders| folders.first())
			.and_then(|folder| folder.uri.to_file_path().map(std::borrow::Cow::into_owned))
			.or_else(|| {
				#[allow(deprecated)]
				params
					.root_uri
					.as_ref()
					.and_then(|uri| uri.to_file_path().map(std::borrow::Cow::into_owned))
			});

		{
			let mut state = self.state.write().await;
			state.root = root;
			match &params.initialization_options {
				Some(options) if !options.is_null() => state.apply_client_settings(options),
				_ => state.reload_config(),
			}
		}

		Ok(InitializeResult {
			capabilities: ServerCapabilities {
				text_document_sync: Some(TextDocumentSyncCapability::Kind(
					TextDocumentSyncKind::INCREMENTAL,
				)),
				code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
				execute_command_provider: Some(ExecuteCommandOptions {
					commands: vec![INSERT_TOC_COMMAND.to_string()],
					..Default::default()
				}),
				..Default::default()
			},
			server_info: Some(ServerInfo {
				name: "mdtoc-lsp".to_string(),
				version: Some(env!("CARGO_PKG_VERSION").to_string()),
			}),
			offset_encoding: None,
		})
	}

	async fn initialized(&self, _: InitializedParams) {
		self.client
			.log_message(MessageType::INFO, "mdtoc language server initialized")
			.await;
	}

	async fn shutdown(&self) -> LspResult<()> {
		Ok(())
	}

	async fn did_open(&self, params: DidOpenTextDocumentParams) {
		let doc = params.text_document;
		self.on_document_change(doc.uri, doc.text, Some(doc.language_id.as_str()))
			.await;
	}

	async fn did_change(&self, params: DidChangeTextDocumentParams) {
		let uri = params.text_document.uri;

		// Get the current document content to apply incremental changes to.
		let current_content = {
			let state = self.state.read().await;
			state.documents.get(&uri).map(|doc| doc.content.clone())
		};

		let Some(mut content) = current_content else {
			// Document not tracked yet — use the last change as full content.
			if let Some(change) = params.content_changes.into_iter().next_back() {
				self.on_document_change(uri, change.text, None).await;
			}
			return;
		};

		// Apply each content change in order. With INCREMENTAL sync, each
		// change has a `range` indicating the region to replace. If `range`
		// is `None`, treat it as a full content replacement.
		for change in params.content_changes {
			match change.range {
				Some(range) => apply_range_change(&mut content, range, &change.text),
				None => content = change.text,
			}
		}

		self.on_document_change(uri, content, None).await;
	}

	async fn did_save(&self, params: DidSaveTextDocumentParams) {
		let is_config = params.text_document.uri.path().as_str().ends_with("mdtoc.toml");
		if is_config {
			self.state.write().await.reload_config();
		}
	}

	async fn did_close(&self, params: DidCloseTextDocumentParams) {
		let mut state = self.state.write().await;
		state.documents.remove(&params.text_document.uri);
	}

	async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
		let mut state = self.state.write().await;
		if params.settings.is_null() {
			state.reload_config();
		} else {
			state.apply_client_settings(&params.settings);
		}
	}

	async fn code_action(&self, params: CodeActionParams) -> LspResult<Option<CodeActionResponse>> {
		let state = self.state.read().await;
		let actions = compute_code_actions(&state, &params.text_document.uri, params.range);

		if actions.is_empty() {
			Ok(None)
		} else {
			Ok(Some(actions))
		}
	}

	async fn execute_command(&self, params: ExecuteCommandParams) -> LspResult<Option<Value>> {
		if params.command == INSERT_TOC_COMMAND {
			self.run_insert_command(&params.arguments).await;
		} else {
			tracing::debug!(command = %params.command, "ignoring unknown command");
		}

		Ok(None)
	}
}

/// Start the LSP server on stdin/stdout. Used by the `mdtoc lsp` CLI
/// subcommand.
pub async fn run_server() {
	let stdin = tokio::io::stdin();
	let stdout = tokio::io::stdout();

	let (service, socket) = tower_lsp_server::LspService::new(MdtocLanguageServer::new);
	tower_lsp_server::Server::new(stdin, stdout, socket)
		.serve(service)
		.await;
}
