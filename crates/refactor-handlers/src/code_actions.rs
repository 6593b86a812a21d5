//! `textDocument/codeAction`: one action per applicable refactoring

use crate::context::qualified_command_name;
use crate::documents::DocumentStore;
use lsp_types::{
    CodeAction, CodeActionKind, CodeActionOrCommand, CodeActionParams, Command, Range,
};
use refactor_foundation::model::{
    list_refactorings, ExtensionSettings, GenerateTestFileArgs, RefactorArgs,
};
use refactor_foundation::{ByteRange, ServerResult, SettingsProvider, TextDocument};
use std::sync::Arc;
use tracing::debug;

/// Answers code action requests from open documents and current settings
pub struct CodeActionService {
    documents: DocumentStore,
    settings: Arc<dyn SettingsProvider>,
    command_prefix: String,
}

impl CodeActionService {
    pub fn new(
        documents: DocumentStore,
        settings: Arc<dyn SettingsProvider>,
        command_prefix: impl Into<String>,
    ) -> Self {
        Self {
            documents,
            settings,
            command_prefix: command_prefix.into(),
        }
    }

    pub async fn code_actions(
        &self,
        params: &CodeActionParams,
    ) -> ServerResult<Vec<CodeActionOrCommand>> {
        let uri = params.text_document.uri.as_str();
        let Some(document) = self.documents.get(uri) else {
            debug!(uri = %uri, "Code actions requested for unknown document");
            return Ok(Vec::new());
        };

        let settings = self.settings.settings().await;
        list_code_actions(&document, &params.range, &settings, &self.command_prefix)
    }
}

/// Refactor and test-file actions for a selection, sorted by title
pub fn list_code_actions(
    document: &TextDocument,
    range: &Range,
    settings: &ExtensionSettings,
    command_prefix: &str,
) -> ServerResult<Vec<CodeActionOrCommand>> {
    let byte_range = ByteRange::from_range(Some(range), Some(document));
    let refactorings = list_refactorings(settings.is_micro_refactorings_shown);

    let mut actions = Vec::new();
    if settings.is_generate_test_files_enabled && byte_range.is_range() {
        actions.extend(test_file_actions(
            document,
            &byte_range,
            &refactorings,
            command_prefix,
        )?);
    }
    if byte_range.is_range() && !byte_range.is_empty() {
        actions.extend(refactor_actions(
            document,
            &byte_range,
            &refactorings,
            false,
            command_prefix,
        )?);
        if settings.is_unsafe_refactoring_shown {
            actions.extend(refactor_actions(
                document,
                &byte_range,
                &refactorings,
                true,
                command_prefix,
            )?);
        }
    }

    actions.sort_by(|a, b| title(a).cmp(title(b)));
    Ok(actions)
}

fn title(action: &CodeActionOrCommand) -> &str {
    match action {
        CodeActionOrCommand::CodeAction(action) => &action.title,
        CodeActionOrCommand::Command(command) => &command.title,
    }
}

fn refactor_actions(
    document: &TextDocument,
    byte_range: &ByteRange,
    refactorings: &[&str],
    is_unsafe: bool,
    command_prefix: &str,
) -> ServerResult<Vec<CodeActionOrCommand>> {
    refactorings
        .iter()
        .map(|refactoring| {
            let args = RefactorArgs {
                file: document.uri().to_string(),
                version: Some(document.version()),
                refactoring: refactoring.to_string(),
                selection: byte_range.to_argument_string(),
                is_unsafe,
            };
            let title = if is_unsafe {
                format!("Refactor - {} - unsafe", refactoring)
            } else {
                format!("Refactor - {}", refactoring)
            };
            Ok(code_action(
                title,
                Command {
                    title: "refactor".to_string(),
                    command: qualified_command_name(command_prefix, "refactor"),
                    arguments: Some(vec![serde_json::to_value(&args)?]),
                },
            ))
        })
        .collect()
}

fn test_file_actions(
    document: &TextDocument,
    byte_range: &ByteRange,
    refactorings: &[&str],
    command_prefix: &str,
) -> ServerResult<Vec<CodeActionOrCommand>> {
    let doc_name = document_name(document.uri());
    let mut actions = Vec::with_capacity(refactorings.len() * 2);

    for should_fail in [true, false] {
        for refactoring in refactorings {
            let args = GenerateTestFileArgs {
                file_uri: document.uri().to_string(),
                refactoring: refactoring.to_string(),
                selection: byte_range.to_argument_string(),
                should_fail,
            };
            let mut title = format!("Generate {}.json for {}", doc_name, refactoring);
            if should_fail {
                title.push_str(" (failing)");
            }
            actions.push(code_action(
                title,
                Command {
                    title: "generate".to_string(),
                    command: qualified_command_name(command_prefix, "generate_test_file"),
                    arguments: Some(vec![serde_json::to_value(&args)?]),
                },
            ));
        }
    }
    Ok(actions)
}

fn code_action(title: String, command: Command) -> CodeActionOrCommand {
    CodeActionOrCommand::CodeAction(CodeAction {
        title,
        kind: Some(CodeActionKind::REFACTOR),
        command: Some(command),
        ..Default::default()
    })
}

/// File name of a URI without its extension
fn document_name(uri: &str) -> &str {
    let name = uri.rsplit('/').next().unwrap_or(uri);
    match name.rfind('.') {
        Some(dot) => &name[..dot],
        None => name,
    }
}
