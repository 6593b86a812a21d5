use super::command_handler::CommandHandler;
use crate::context::CommandContext;
use async_trait::async_trait;
use refactor_foundation::ServerResult;
use serde_json::Value;
use tracing::info;

/// Runs `cargo check` over the workspace and reports its exit status
pub struct CargoCheckCommand;

impl CargoCheckCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CargoCheckCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for CargoCheckCommand {
    fn command_names(&self) -> &[&str] {
        &["cargo_check"]
    }

    async fn handle_command(
        &self,
        context: &CommandContext,
        _arguments: &[Value],
    ) -> ServerResult<Value> {
        let workspace = context.workspace_root().await?;
        let settings = context.settings.settings().await;
        let command = context
            .commands
            .build_cargo_check_command(Some(&settings.cargo_toolchain));

        let output = context.runner.execute(&command, workspace.path()).await?;
        info!(exit_code = output.exit_code, "cargo check finished");

        context
            .show_info(format!(
                "cargo check returned with status: {}",
                output.exit_code
            ))
            .await;
        Ok(Value::Null)
    }
}
