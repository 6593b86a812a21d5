//! Command handler registry
//!
//! Routes `workspace/executeCommand` requests to the handler registered for
//! the command name, and turns every failure into a user notification.

use super::command_handler::CommandHandler;
use super::{CandidatesCommand, CargoCheckCommand, GenerateTestFileCommand, RefactorCommand};
use crate::context::CommandContext;
use lsp_types::ExecuteCommandParams;
use refactor_foundation::{log_error, ServerError, ServerResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Registry mapping bare command names to their handlers
pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
    /// Map from command name to handler type name (for diagnostics)
    handler_names: HashMap<String, String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            handler_names: HashMap::new(),
        }
    }

    /// Registry with the refactor, generate_test_file, candidates and
    /// cargo_check commands
    pub fn with_default_handlers() -> Self {
        let mut registry = Self::new();
        registry.register_with_name(Arc::new(RefactorCommand::new()), "RefactorCommand");
        registry.register_with_name(
            Arc::new(GenerateTestFileCommand::new()),
            "GenerateTestFileCommand",
        );
        registry.register_with_name(Arc::new(CandidatesCommand::new()), "CandidatesCommand");
        registry.register_with_name(Arc::new(CargoCheckCommand::new()), "CargoCheckCommand");
        registry
    }

    /// Register every command name the handler answers to.
    ///
    /// A name registered twice is replaced and a warning logged.
    pub fn register_with_name(&mut self, handler: Arc<dyn CommandHandler>, handler_name: &str) {
        for command_name in handler.command_names() {
            debug!(
                command_name = %command_name,
                handler_name = %handler_name,
                "Registering command handler"
            );

            if self
                .handlers
                .insert(command_name.to_string(), handler.clone())
                .is_some()
            {
                warn!(
                    command_name = %command_name,
                    "Command handler replaced (duplicate registration)"
                );
            }

            self.handler_names
                .insert(command_name.to_string(), handler_name.to_string());
        }
    }

    pub fn has_command(&self, command_name: &str) -> bool {
        self.handlers.contains_key(command_name)
    }

    /// Fully qualified names of all registered commands, sorted
    pub fn command_names(&self, context: &CommandContext) -> Vec<String> {
        let mut names: Vec<String> = self
            .handlers
            .keys()
            .map(|name| context.command_name(name))
            .collect();
        names.sort();
        names
    }

    /// Route a command to its handler.
    ///
    /// Accepts both `<prefix>.<name>` and the bare name.
    pub async fn handle_command(
        &self,
        context: &CommandContext,
        command: &str,
        arguments: &[Value],
    ) -> ServerResult<Value> {
        let name = command
            .strip_prefix(context.command_prefix.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(command);

        match self.handlers.get(name) {
            Some(handler) => {
                debug!(
                    command = %name,
                    handler = self.handler_names.get(name).map(String::as_str).unwrap_or("UnknownHandler"),
                    "Dispatching command"
                );
                handler.handle_command(context, arguments).await
            }
            None => Err(ServerError::invalid_request(format!(
                "Unknown command: '{}'. Available commands: {}",
                command,
                self.command_names(context).join(", ")
            ))),
        }
    }

    /// Execute a command, reporting any failure to the user
    pub async fn execute(
        &self,
        context: &CommandContext,
        params: ExecuteCommandParams,
    ) -> ServerResult<Value> {
        let result = self
            .handle_command(context, &params.command, &params.arguments)
            .await;

        if let Err(e) = &result {
            log_error!(e, "Command failed", command = params.command.as_str());
            context.show_error(e.user_message()).await;
        }
        result
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::with_default_handlers()
    }
}
