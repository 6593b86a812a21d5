use super::command_handler::CommandHandler;
use crate::context::CommandContext;
use async_trait::async_trait;
use refactor_foundation::model::GenerateTestFileArgs;
use refactor_foundation::{ServerError, ServerResult};
use refactor_services::{generate_test_file_edits, GENERATE_TEST_FILE_LABEL};
use serde_json::Value;
use tracing::debug;

/// Writes a JSON test-case description next to a source file
pub struct GenerateTestFileCommand;

impl GenerateTestFileCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GenerateTestFileCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for GenerateTestFileCommand {
    fn command_names(&self) -> &[&str] {
        &["generate_test_file"]
    }

    async fn handle_command(
        &self,
        context: &CommandContext,
        arguments: &[Value],
    ) -> ServerResult<Value> {
        if !context.settings.settings().await.is_generate_test_files_enabled {
            debug!("Test file generation is disabled");
            return Ok(Value::Null);
        }
        if arguments.len() != 1 {
            debug!(count = arguments.len(), "Expected exactly one argument");
            return Ok(Value::Null);
        }

        let args: GenerateTestFileArgs = serde_json::from_value(arguments[0].clone())
            .map_err(|e| ServerError::invalid_request(e.to_string()))?;

        for edit in generate_test_file_edits(&args)? {
            if !context.apply_edit(edit).await {
                context
                    .show_error(format!("Failed to apply: {}", GENERATE_TEST_FILE_LABEL))
                    .await;
                break;
            }
        }
        Ok(Value::Null)
    }
}
