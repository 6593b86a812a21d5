//! Shared state handed to every command handler

use lsp_types::{ApplyWorkspaceEditParams, MessageType};
use refactor_config::AppConfig;
use refactor_foundation::model::OutputFormat;
use refactor_foundation::{
    CommandRunner, NotificationSink, ServerError, ServerResult, SettingsProvider,
    WorkspaceProvider,
};
use refactor_services::{CommandBuilder, WorkspaceRoot};
use std::sync::Arc;
use tracing::{debug, warn};

/// Collaborators and configuration for command execution.
///
/// Built once at startup; handlers only borrow it.
pub struct CommandContext {
    pub settings: Arc<dyn SettingsProvider>,
    pub workspace: Arc<dyn WorkspaceProvider>,
    pub notifications: Arc<dyn NotificationSink>,
    pub runner: Arc<dyn CommandRunner>,
    pub commands: CommandBuilder,
    pub output_format: OutputFormat,
    /// Prefix of command names, e.g. `mrefactor`
    pub command_prefix: String,
}

impl CommandContext {
    pub fn new(
        config: &AppConfig,
        settings: Arc<dyn SettingsProvider>,
        workspace: Arc<dyn WorkspaceProvider>,
        notifications: Arc<dyn NotificationSink>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            settings,
            workspace,
            notifications,
            runner,
            commands: CommandBuilder::new(config.execution.target_dir.clone()),
            output_format: config.execution.output_format,
            command_prefix: config.client.command_prefix.clone(),
        }
    }

    /// Fully qualified name of a command
    pub fn command_name(&self, name: &str) -> String {
        qualified_command_name(&self.command_prefix, name)
    }

    /// The workspace root, which every command needs
    pub async fn workspace_root(&self) -> ServerResult<WorkspaceRoot> {
        match self.workspace.workspace_folder().await? {
            Some(uri) => WorkspaceRoot::from_uri(&uri),
            None => Err(ServerError::unknown_file_path("no workspace folder is open")),
        }
    }

    pub async fn show_info(&self, message: impl Into<String>) {
        self.notifications
            .show_message(MessageType::INFO, message.into())
            .await;
    }

    pub async fn show_error(&self, message: impl Into<String>) {
        self.notifications
            .show_message(MessageType::ERROR, message.into())
            .await;
    }

    /// Ask the editor to apply one edit; whether it was applied.
    ///
    /// A transport failure counts as not applied.
    pub async fn apply_edit(&self, edit: ApplyWorkspaceEditParams) -> bool {
        if let Ok(json) = serde_json::to_string(&edit) {
            self.notifications.log_message(MessageType::LOG, json).await;
        }

        match self.workspace.apply_edit(edit).await {
            Ok(response) => {
                if !response.applied {
                    debug!(reason = ?response.failure_reason, "Edit was not applied");
                }
                response.applied
            }
            Err(e) => {
                warn!(error = %e, "Failed to send workspace edit");
                false
            }
        }
    }
}

/// `<prefix>.<name>`, or the bare name without a prefix
pub fn qualified_command_name(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
