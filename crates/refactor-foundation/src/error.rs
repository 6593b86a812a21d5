//! Error handling for the refactoring language server

use serde::Serialize;
use thiserror::Error;

/// Error type shared by every layer of the server.
///
/// Variants follow the failure classes of a command invocation: argument
/// validation, concurrency, external tool execution, output parsing and
/// refactoring-level (semantic) errors reported by the tool itself.
#[derive(Error, Debug, Serialize)]
#[non_exhaustive]
#[serde(tag = "type", content = "details")]
pub enum ServerError {
    #[error("invalid args: {message}")]
    InvalidRequest { message: String },

    #[error("'{path}' is not a path")]
    InvalidBinaryPath { path: String },

    #[error("unknown file path: {file}")]
    UnknownFilePath { file: String },

    #[error("Shell already executing")]
    ShellAlreadyExecuting,

    #[error("Command timed out after {seconds} seconds: {command}")]
    Timeout { command: String, seconds: u64 },

    #[error("Failed to execute command '{command}': {message}")]
    Spawn { command: String, message: String },

    #[error("Refactoring failed. \nstderr: {stderr}\nstdout: {stdout}")]
    ToolFailed {
        exit_code: i32,
        stdout: String,
        stderr: String,
    },

    #[error("Failed to parse refactoring output: {message}")]
    Parse { message: String },

    #[error("{message}")]
    Refactoring { kind: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    #[serde(serialize_with = "serialize_io_error")]
    Io(#[from] std::io::Error),

    #[error("LSP error: {0}")]
    Lsp(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Get the error category for structured logging
    pub fn category(&self) -> &'static str {
        match self {
            ServerError::InvalidRequest { .. } => "invalid_request",
            ServerError::InvalidBinaryPath { .. } => "invalid_binary_path",
            ServerError::UnknownFilePath { .. } => "unknown_file_path",
            ServerError::ShellAlreadyExecuting => "shell_already_executing",
            ServerError::Timeout { .. } => "timeout",
            ServerError::Spawn { .. } => "spawn_error",
            ServerError::ToolFailed { .. } => "tool_failed",
            ServerError::Parse { .. } => "parse_error",
            ServerError::Refactoring { .. } => "refactoring_error",
            ServerError::Config { .. } => "config_error",
            ServerError::Io(_) => "io_error",
            ServerError::Lsp(_) => "lsp_error",
            ServerError::Internal(_) => "internal_error",
        }
    }

    /// Errors caused by what the client sent rather than by the server or the tool
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServerError::InvalidRequest { .. }
                | ServerError::InvalidBinaryPath { .. }
                | ServerError::UnknownFilePath { .. }
                | ServerError::ShellAlreadyExecuting
        )
    }

    /// Create a new invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a new invalid binary path error
    pub fn invalid_binary_path(path: impl Into<String>) -> Self {
        Self::InvalidBinaryPath { path: path.into() }
    }

    /// Create a new unknown file path error
    pub fn unknown_file_path(file: impl Into<String>) -> Self {
        Self::UnknownFilePath { file: file.into() }
    }

    /// Create a new parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new refactoring error from a tool-reported error entry
    pub fn refactoring(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Refactoring {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new LSP error
    pub fn lsp(message: impl Into<String>) -> Self {
        Self::Lsp(message.into())
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Message shown to the user in an error notification.
    ///
    /// Semantic errors surface the tool's message verbatim.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::Parse {
            message: err.to_string(),
        }
    }
}

/// Result type alias for server operations
pub type ServerResult<T> = Result<T, ServerError>;

/// Log an error together with its category
#[macro_export]
macro_rules! log_error {
    ($err:expr, $msg:literal) => {
        tracing::error!(
            error_category = $err.category(),
            error = %$err,
            is_client_error = $err.is_client_error(),
            $msg
        )
    };
    ($err:expr, $msg:literal, $($field:ident = $value:expr),* $(,)?) => {
        tracing::error!(
            error_category = $err.category(),
            error = %$err,
            is_client_error = $err.is_client_error(),
            $($field = $value,)*
            $msg
        )
    };
}

fn serialize_io_error<S>(error: &std::io::Error, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&error.to_string())
}
