//! Request handlers of the refactoring language server

pub mod code_actions;
pub mod context;
pub mod documents;
pub mod handlers;
pub mod hover;

pub use code_actions::{list_code_actions, CodeActionService};
pub use context::CommandContext;
pub use documents::DocumentStore;
pub use handlers::{CommandHandler, CommandRegistry};
pub use hover::{collapse_indentation, HoverService};
