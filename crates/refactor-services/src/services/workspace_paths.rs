//! Conversions between workspace-relative paths, file paths and URIs

use lsp_types::Uri;
use refactor_foundation::{ServerError, ServerResult};
use std::path::{Component, Path, PathBuf};

/// The single workspace root the server operates in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceRoot {
    path: PathBuf,
}

impl WorkspaceRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Root from a `file://` URI as reported by the editor
    pub fn from_uri(uri: &str) -> ServerResult<Self> {
        Ok(Self::new(uri_to_path(uri)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a document relative to the root, `/`-separated.
    ///
    /// Documents outside the root produce `..` segments.
    pub fn relative_path(&self, document_uri: &str) -> ServerResult<String> {
        let document = uri_to_path(document_uri)?;
        let relative = pathdiff::diff_paths(&document, &self.path)
            .ok_or_else(|| ServerError::unknown_file_path(document_uri))?;

        Ok(relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"))
    }

    /// Absolute, lexically normalized path of a root-relative file name
    pub fn resolve(&self, file_name: &str) -> PathBuf {
        normalize(&self.path.join(file_name))
    }

    /// URI of a root-relative file name
    pub fn uri_for(&self, file_name: &str) -> ServerResult<Uri> {
        path_to_uri(&self.resolve(file_name))
    }
}

/// File path of a `file://` URI
pub fn uri_to_path(uri: &str) -> ServerResult<PathBuf> {
    url::Url::parse(uri)
        .ok()
        .and_then(|url| url.to_file_path().ok())
        .ok_or_else(|| ServerError::unknown_file_path(uri))
}

/// `file://` URI of an absolute path
pub fn path_to_uri(path: &Path) -> ServerResult<Uri> {
    let url = url::Url::from_file_path(path)
        .map_err(|_| ServerError::unknown_file_path(path.display().to_string()))?;

    url.as_str()
        .parse()
        .map_err(|e| ServerError::internal(format!("Failed to parse URI: {}", e)))
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
