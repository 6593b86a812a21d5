use super::command_handler::CommandHandler;
use crate::context::CommandContext;
use async_trait::async_trait;
use refactor_foundation::{ServerError, ServerResult};
use refactor_services::new_file_edits;
use serde_json::Value;
use tracing::{debug, info};

/// Lists the sites a refactoring could apply to and writes them to
/// `<kind>-candidates.json` at the workspace root
pub struct CandidatesCommand;

impl CandidatesCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CandidatesCommand {
    fn default() -> Self {
        Self::new()
    }
}

fn refactoring_kind(arguments: &[Value]) -> ServerResult<&str> {
    arguments
        .first()
        .and_then(Value::as_str)
        .filter(|kind| !kind.is_empty())
        .ok_or_else(|| {
            ServerError::invalid_request(
                serde_json::to_string(arguments).unwrap_or_else(|_| "<unprintable>".to_string()),
            )
        })
}

#[async_trait]
impl CommandHandler for CandidatesCommand {
    fn command_names(&self) -> &[&str] {
        &["candidates"]
    }

    async fn handle_command(
        &self,
        context: &CommandContext,
        arguments: &[Value],
    ) -> ServerResult<Value> {
        let kind = refactoring_kind(arguments)?;
        let workspace = context.workspace_root().await?;
        let settings = context.settings.settings().await;

        let command = context.commands.build_candidate_query_command(
            kind,
            Some(&settings.refactoring_binary_path),
            Some(&settings.cargo_toolchain),
        )?;

        info!(refactoring = %kind, "Querying refactoring candidates");
        let output = context.runner.execute(&command, workspace.path()).await?;
        if !output.success() {
            return Err(ServerError::refactoring(
                kind,
                format!(
                    "candidates failed with code: {}\nstderr:{}",
                    output.exit_code, output.stderr
                ),
            ));
        }

        let uri = workspace.uri_for(&format!("{}-candidates.json", kind))?;
        let label = context.command_name("candidates");
        for edit in new_file_edits(uri, output.stdout, &label) {
            if !context.apply_edit(edit).await {
                context
                    .show_error(format!("Failed to apply: {}", label))
                    .await;
                return Ok(Value::Null);
            }
        }

        debug!(refactoring = %kind, "Candidates written");
        Ok(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_refactoring_kind_requires_string() {
        assert_eq!(refactoring_kind(&[json!("box-field")]).unwrap(), "box-field");
        assert!(refactoring_kind(&[]).is_err());
        assert!(refactoring_kind(&[json!(42)]).is_err());
        assert!(refactoring_kind(&[json!("")]).is_err());
    }
}
