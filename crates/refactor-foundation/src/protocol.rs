//! Contracts for the collaborators the command pipeline depends on
//!
//! The server implements these on top of its LSP connection; tests replace
//! them with mocks.

use crate::error::ServerResult;
use crate::model::{ExtensionSettings, ShellOutput};
use async_trait::async_trait;
use lsp_types::{ApplyWorkspaceEditParams, ApplyWorkspaceEditResponse, MessageType};
use std::path::Path;

/// Source of the user's extension settings
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    /// Current settings. Implementations fall back to defaults rather than fail.
    async fn settings(&self) -> ExtensionSettings;
}

/// Access to the editor's workspace
#[async_trait]
pub trait WorkspaceProvider: Send + Sync {
    /// URI of the single workspace root, if one is open
    async fn workspace_folder(&self) -> ServerResult<Option<String>>;

    /// Ask the editor to apply an edit
    async fn apply_edit(
        &self,
        params: ApplyWorkspaceEditParams,
    ) -> ServerResult<ApplyWorkspaceEditResponse>;
}

/// User-visible messages plus the debug log channel
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn show_message(&self, typ: MessageType, message: String);

    async fn log_message(&self, typ: MessageType, message: String);
}

/// Runs external commands
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a shell command line to completion in `working_dir`.
    ///
    /// A non-zero exit status is returned as data, not as an error.
    async fn execute(&self, command: &str, working_dir: &Path) -> ServerResult<ShellOutput>;
}
