//! Test helpers

use async_trait::async_trait;
use lsp_types::MessageType;
use refactor_foundation::model::ExtensionSettings;
use refactor_foundation::NotificationSink;
use std::sync::Mutex;

/// Settings pointing at a tool manifest, everything else default
pub fn settings_with_binary(binary_path: &str) -> ExtensionSettings {
    ExtensionSettings {
        refactoring_binary_path: binary_path.to_string(),
        ..Default::default()
    }
}

/// Notification sink that records everything it is sent
#[derive(Default)]
pub struct RecordingSink {
    shown: Mutex<Vec<(MessageType, String)>>,
    logged: Mutex<Vec<(MessageType, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// User-visible messages in the order they were shown
    pub fn shown(&self) -> Vec<(MessageType, String)> {
        self.shown.lock().unwrap().clone()
    }

    /// Log channel messages in the order they were logged
    pub fn logged(&self) -> Vec<(MessageType, String)> {
        self.logged.lock().unwrap().clone()
    }

    /// Messages shown with error severity
    pub fn errors(&self) -> Vec<String> {
        self.shown_with(MessageType::ERROR)
    }

    /// Messages shown with info severity
    pub fn infos(&self) -> Vec<String> {
        self.shown_with(MessageType::INFO)
    }

    fn shown_with(&self, typ: MessageType) -> Vec<String> {
        self.shown()
            .into_iter()
            .filter(|(t, _)| *t == typ)
            .map(|(_, message)| message)
            .collect()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn show_message(&self, typ: MessageType, message: String) {
        self.shown.lock().unwrap().push((typ, message));
    }

    async fn log_message(&self, typ: MessageType, message: String) {
        self.logged.lock().unwrap().push((typ, message));
    }
}
