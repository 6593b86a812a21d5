//! Foundation layer for the refactoring language server
//!
//! Errors, the request and tool-output data model, selection offsets, text
//! documents and the collaborator contracts shared by every other crate.

pub mod byte_range;
pub mod document;
pub mod error;
pub mod model;
pub mod protocol;

pub use byte_range::ByteRange;
pub use document::TextDocument;
pub use error::{ServerError, ServerResult};
pub use protocol::{CommandRunner, NotificationSink, SettingsProvider, WorkspaceProvider};
