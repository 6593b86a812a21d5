//! Collaborators backed by requests to the editor

use crate::connection::Connection;
use async_trait::async_trait;
use lsp_types::{
    ApplyWorkspaceEditParams, ApplyWorkspaceEditResponse, ConfigurationItem,
    ConfigurationParams, LogMessageParams, MessageType, ShowMessageParams, WorkspaceFolder,
};
use refactor_foundation::model::ExtensionSettings;
use refactor_foundation::{
    NotificationSink, ServerError, ServerResult, SettingsProvider, WorkspaceProvider,
};
use serde_json::Value;
use std::sync::{Arc, RwLock};
use tracing::{debug, error, info, warn};

/// Settings, workspace and notifications provided by the connected editor
pub struct EditorClient {
    connection: Arc<Connection>,
    settings_section: String,
    default_settings: ExtensionSettings,
    /// Root reported in `initialize`, used when the editor has no folder list
    initial_root: RwLock<Option<String>>,
}

impl EditorClient {
    pub fn new(
        connection: Arc<Connection>,
        settings_section: impl Into<String>,
        default_settings: ExtensionSettings,
    ) -> Self {
        Self {
            connection,
            settings_section: settings_section.into(),
            default_settings,
            initial_root: RwLock::new(None),
        }
    }

    pub fn set_initial_root(&self, root: Option<String>) {
        if let Ok(mut initial_root) = self.initial_root.write() {
            *initial_root = root;
        }
    }

    fn initial_root(&self) -> Option<String> {
        self.initial_root.read().ok().and_then(|root| root.clone())
    }

    async fn fetch_settings(&self) -> ServerResult<ExtensionSettings> {
        let params = ConfigurationParams {
            items: vec![ConfigurationItem {
                scope_uri: None,
                section: Some(self.settings_section.clone()),
            }],
        };
        let result = self
            .connection
            .send_request("workspace/configuration", serde_json::to_value(params)?)
            .await?;

        let section = match result {
            Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
            _ => Value::Null,
        };
        if section.is_null() {
            return Ok(self.default_settings.clone());
        }
        Ok(serde_json::from_value(section)?)
    }
}

#[async_trait]
impl SettingsProvider for EditorClient {
    async fn settings(&self) -> ExtensionSettings {
        match self.fetch_settings().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "Falling back to configured default settings");
                self.default_settings.clone()
            }
        }
    }
}

#[async_trait]
impl WorkspaceProvider for EditorClient {
    async fn workspace_folder(&self) -> ServerResult<Option<String>> {
        match self
            .connection
            .send_request("workspace/workspaceFolders", Value::Null)
            .await
        {
            Ok(Value::Null) => Ok(self.initial_root()),
            Ok(folders) => {
                let folders: Vec<WorkspaceFolder> = serde_json::from_value(folders)?;
                if folders.len() > 1 {
                    debug!(count = folders.len(), "Using the first of several workspace folders");
                }
                Ok(folders
                    .into_iter()
                    .next()
                    .map(|folder| folder.uri.as_str().to_string())
                    .or_else(|| self.initial_root()))
            }
            Err(e) => {
                debug!(error = %e, "Editor did not list workspace folders");
                Ok(self.initial_root())
            }
        }
    }

    async fn apply_edit(
        &self,
        params: ApplyWorkspaceEditParams,
    ) -> ServerResult<ApplyWorkspaceEditResponse> {
        let result = self
            .connection
            .send_request("workspace/applyEdit", serde_json::to_value(params)?)
            .await?;
        serde_json::from_value(result)
            .map_err(|e| ServerError::lsp(format!("Invalid applyEdit response: {}", e)))
    }
}

#[async_trait]
impl NotificationSink for EditorClient {
    async fn show_message(&self, typ: MessageType, message: String) {
        if typ == MessageType::ERROR {
            error!(message = %message, "Showing error to user");
        } else {
            info!(message = %message, "Showing message to user");
        }
        let params = ShowMessageParams { typ, message };
        if let Ok(params) = serde_json::to_value(params) {
            if let Err(e) = self
                .connection
                .send_notification("window/showMessage", params)
                .await
            {
                warn!(error = %e, "Failed to show message");
            }
        }
    }

    async fn log_message(&self, typ: MessageType, message: String) {
        debug!(message = %message, "Client log");
        let params = LogMessageParams { typ, message };
        if let Ok(params) = serde_json::to_value(params) {
            if let Err(e) = self
                .connection
                .send_notification("window/logMessage", params)
                .await
            {
                warn!(error = %e, "Failed to log message");
            }
        }
    }
}
