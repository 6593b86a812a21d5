use dashmap::DashMap;
use lsp_types::{
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams,
};
use refactor_foundation::TextDocument;
use std::sync::Arc;
use tracing::{debug, warn};

/// Documents the editor currently has open, keyed by URI.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Arc<DashMap<String, TextDocument>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, params: DidOpenTextDocumentParams) {
        let item = params.text_document;
        let uri = item.uri.as_str().to_string();
        debug!(uri = %uri, version = item.version, "Document opened");
        self.documents.insert(
            uri.clone(),
            TextDocument::new(uri, item.language_id, item.version, item.text),
        );
    }

    pub fn change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.as_str();
        match self.documents.get_mut(uri) {
            Some(mut document) => {
                document.apply_changes(params.content_changes, params.text_document.version)
            }
            None => warn!(uri = %uri, "Change for a document that is not open"),
        }
    }

    pub fn close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri.as_str();
        debug!(uri = %uri, "Document closed");
        self.documents.remove(uri);
    }

    /// Snapshot of an open document
    pub fn get(&self, uri: &str) -> Option<TextDocument> {
        self.documents.get(uri).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
