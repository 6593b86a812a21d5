//! Mock implementations for testing

use async_trait::async_trait;
use lsp_types::{ApplyWorkspaceEditParams, ApplyWorkspaceEditResponse, MessageType};
use mockall::mock;
use refactor_foundation::model::{ExtensionSettings, ShellOutput};
use refactor_foundation::{
    CommandRunner, NotificationSink, ServerResult, SettingsProvider, WorkspaceProvider,
};
use std::path::Path;

mock! {
    pub SettingsProvider {}

    #[async_trait]
    impl SettingsProvider for SettingsProvider {
        async fn settings(&self) -> ExtensionSettings;
    }
}

mock! {
    pub WorkspaceProvider {}

    #[async_trait]
    impl WorkspaceProvider for WorkspaceProvider {
        async fn workspace_folder(&self) -> ServerResult<Option<String>>;
        async fn apply_edit(
            &self,
            params: ApplyWorkspaceEditParams,
        ) -> ServerResult<ApplyWorkspaceEditResponse>;
    }
}

mock! {
    pub NotificationSink {}

    #[async_trait]
    impl NotificationSink for NotificationSink {
        async fn show_message(&self, typ: MessageType, message: String);
        async fn log_message(&self, typ: MessageType, message: String);
    }
}

mock! {
    pub CommandRunner {}

    #[async_trait]
    impl CommandRunner for CommandRunner {
        async fn execute(&self, command: &str, working_dir: &Path) -> ServerResult<ShellOutput>;
    }
}

/// Workspace rooted at `root_uri` that accepts every edit
pub fn workspace_accepting_edits(root_uri: &str) -> MockWorkspaceProvider {
    let root = root_uri.to_string();
    let mut workspace = MockWorkspaceProvider::new();
    workspace
        .expect_workspace_folder()
        .returning(move || Ok(Some(root.clone())));
    workspace.expect_apply_edit().returning(|_| {
        Ok(ApplyWorkspaceEditResponse {
            applied: true,
            failure_reason: None,
            failed_change: None,
        })
    });
    workspace
}

/// Settings provider that always answers `settings`
pub fn settings_provider(settings: ExtensionSettings) -> MockSettingsProvider {
    let mut provider = MockSettingsProvider::new();
    provider
        .expect_settings()
        .returning(move || settings.clone());
    provider
}

/// Runner returning the given output for any command
pub fn runner_returning(output: ShellOutput) -> MockCommandRunner {
    let mut runner = MockCommandRunner::new();
    runner
        .expect_execute()
        .returning(move |_, _| Ok(output.clone()));
    runner
}
