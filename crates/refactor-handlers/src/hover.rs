//! `textDocument/hover`: shows the type of the expression under the cursor

use crate::documents::DocumentStore;
use lsp_types::{
    Hover, HoverContents, HoverParams, LanguageString, MarkedString, Position, Range,
};
use refactor_foundation::{
    log_error, CommandRunner, ServerError, ServerResult, SettingsProvider, WorkspaceProvider,
};
use refactor_services::{CommandBuilder, WorkspaceRoot};
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use tracing::debug;

pub struct HoverService {
    documents: DocumentStore,
    settings: Arc<dyn SettingsProvider>,
    workspace: Arc<dyn WorkspaceProvider>,
    runner: Arc<dyn CommandRunner>,
    commands: CommandBuilder,
}

impl HoverService {
    pub fn new(
        documents: DocumentStore,
        settings: Arc<dyn SettingsProvider>,
        workspace: Arc<dyn WorkspaceProvider>,
        runner: Arc<dyn CommandRunner>,
        commands: CommandBuilder,
    ) -> Self {
        Self {
            documents,
            settings,
            workspace,
            runner,
            commands,
        }
    }

    /// Hover for a position; `None` when disabled or on any failure
    pub async fn hover(&self, params: &HoverParams) -> Option<Hover> {
        match self.try_hover(params).await {
            Ok(hover) => hover,
            Err(e) => {
                log_error!(e, "Hover failed");
                None
            }
        }
    }

    async fn try_hover(&self, params: &HoverParams) -> ServerResult<Option<Hover>> {
        let settings = self.settings.settings().await;
        if !settings.is_hover_enabled {
            return Ok(None);
        }

        let position = params.text_document_position_params.position;
        let uri = params.text_document_position_params.text_document.uri.as_str();
        let Some(document) = self.documents.get(uri) else {
            debug!(uri = %uri, "Hover requested for unknown document");
            return Ok(None);
        };

        let workspace = match self.workspace.workspace_folder().await? {
            Some(root) => WorkspaceRoot::from_uri(&root)?,
            None => return Ok(None),
        };
        let relative_file_path = workspace.relative_path(uri)?;

        let offset = document.offset_at(position);
        let command = self.commands.build_hover_type_command(
            &relative_file_path,
            &format!("{}:{}", offset, offset),
            Some(&settings.refactoring_binary_path),
            Some(&settings.cargo_toolchain),
        )?;

        let output = self.runner.execute(&command, workspace.path()).await?;
        if !output.success() {
            return Err(ServerError::ToolFailed {
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        Ok(Some(type_hover(&hover_type(&output.stdout)?, position)))
    }
}

/// The `type` of the first reported expression, or `<empty>`
fn hover_type(stdout: &str) -> ServerResult<String> {
    let entries: Vec<Value> = serde_json::from_str(stdout.trim())?;
    Ok(entries
        .first()
        .and_then(|entry| entry.get("type"))
        .and_then(Value::as_str)
        .map(collapse_indentation)
        .unwrap_or_else(|| "<empty>".to_string()))
}

fn indentation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n([ \t]+)").expect("Invalid regex"))
}

/// Shrink each newline-led run of blanks of length `n` to `n / 8` spaces
pub fn collapse_indentation(text: &str) -> String {
    indentation_regex()
        .replace_all(text, |caps: &regex::Captures<'_>| {
            format!("\n{}", " ".repeat(caps[1].len() / 8))
        })
        .into_owned()
}

fn type_hover(type_name: &str, position: Position) -> Hover {
    Hover {
        contents: HoverContents::Scalar(MarkedString::LanguageString(LanguageString {
            language: "rust".to_string(),
            value: type_name.to_string(),
        })),
        range: Some(Range::new(position, position)),
    }
}
