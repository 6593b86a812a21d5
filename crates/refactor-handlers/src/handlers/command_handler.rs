use crate::context::CommandContext;
use async_trait::async_trait;
use refactor_foundation::ServerResult;
use serde_json::Value;

/// A handler for one or more `workspace/executeCommand` commands
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Bare command names (without prefix) this handler is responsible for
    fn command_names(&self) -> &[&str];

    /// Handle a command given its positional arguments
    async fn handle_command(
        &self,
        context: &CommandContext,
        arguments: &[Value],
    ) -> ServerResult<Value>;
}
