//! The refactor command: run the tool on a selection and apply its changes

use super::command_handler::CommandHandler;
use crate::context::CommandContext;
use async_trait::async_trait;
use refactor_foundation::model::RefactorArgs;
use refactor_foundation::{log_error, ServerError, ServerResult};
use refactor_services::{
    map_changes_to_workspace_edit, merge_changes, parse_output, split_change_sets,
    ParsedOutput,
};
use serde_json::Value;
use tracing::{debug, info};

pub struct RefactorCommand;

impl RefactorCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RefactorCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for RefactorCommand {
    fn command_names(&self) -> &[&str] {
        &["refactor"]
    }

    async fn handle_command(
        &self,
        context: &CommandContext,
        arguments: &[Value],
    ) -> ServerResult<Value> {
        let args = RefactorArgs::from_arguments(arguments)?;

        let workspace = context.workspace_root().await?;
        let relative_file_path = workspace
            .relative_path(&args.file)
            .map_err(|_| ServerError::unknown_file_path(&args.file))?;

        let settings = context.settings.settings().await;
        let command = context.commands.build_refactor_command(
            &relative_file_path,
            &args.refactoring,
            &args.selection,
            args.is_unsafe,
            Some(&settings.refactoring_binary_path),
            Some(&settings.cargo_toolchain),
        )?;

        info!(
            refactoring = %args.refactoring,
            file = %relative_file_path,
            selection = %args.selection,
            is_unsafe = args.is_unsafe,
            "Running refactoring"
        );

        let output = context.runner.execute(&command, workspace.path()).await?;
        if !output.success() {
            return Err(ServerError::ToolFailed {
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        let parsed = parse_output(&output.stdout, context.output_format).map_err(|e| {
            log_error!(e, "Refactoring tool produced unreadable output");
            e
        })?;

        if let Some(error) = parsed.first_error() {
            return Err(ServerError::refactoring(&error.kind, &error.message));
        }

        let change_sets = match parsed {
            ParsedOutput::Structured(_) => split_change_sets(parsed.change_sets()),
            _ => vec![merge_changes(parsed.change_sets())],
        };

        let mut applied = 0;
        let mut failed = 0;
        for changes in change_sets.iter().filter(|c| !c.is_empty()) {
            let edit = map_changes_to_workspace_edit(&args, changes, &workspace)?;
            if context.apply_edit(edit).await {
                applied += 1;
                context
                    .show_info(format!("Applied: {}", args.refactoring))
                    .await;
            } else {
                failed += 1;
                context
                    .show_error(format!("Failed to apply: {}", args.refactoring))
                    .await;
            }
        }

        debug!(
            refactoring = %args.refactoring,
            applied,
            failed,
            "Refactoring finished"
        );

        Ok(Value::Null)
    }
}
