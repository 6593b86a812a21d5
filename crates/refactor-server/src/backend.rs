//! LSP method dispatch

use crate::client::EditorClient;
use crate::connection::{
    read_message, Connection, Incoming, INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND,
    REQUEST_FAILED,
};
use lsp_types::{
    CodeActionParams, CodeActionProviderCapability, DidChangeTextDocumentParams,
    DidCloseTextDocumentParams, DidOpenTextDocumentParams, ExecuteCommandOptions,
    ExecuteCommandParams, HoverParams, HoverProviderCapability, InitializeParams, MessageType,
    ServerCapabilities, TextDocumentSyncCapability, TextDocumentSyncKind,
};
use refactor_config::logging::request_span;
use refactor_config::AppConfig;
use refactor_foundation::{log_error, NotificationSink, ServerError, ServerResult};
use refactor_handlers::{
    CodeActionService, CommandContext, CommandRegistry, DocumentStore, HoverService,
};
use refactor_services::ShellExecutor;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tracing::{debug, info, warn, Instrument};

/// Error returned to the client for a failed request
struct RequestError {
    code: i64,
    message: String,
}

impl RequestError {
    fn invalid_params(error: serde_json::Error) -> Self {
        Self {
            code: INVALID_PARAMS,
            message: error.to_string(),
        }
    }
}

impl From<ServerError> for RequestError {
    fn from(error: ServerError) -> Self {
        let code = match error {
            ServerError::Internal(_) | ServerError::Io(_) => INTERNAL_ERROR,
            _ => REQUEST_FAILED,
        };
        Self {
            code,
            message: error.user_message(),
        }
    }
}

fn params<T: DeserializeOwned>(params: Value) -> Result<T, RequestError> {
    serde_json::from_value(params).map_err(RequestError::invalid_params)
}

/// Server state shared by all requests
pub struct Backend {
    connection: Arc<Connection>,
    client: Arc<EditorClient>,
    documents: DocumentStore,
    registry: CommandRegistry,
    context: CommandContext,
    code_actions: CodeActionService,
    hover: HoverService,
}

impl Backend {
    pub fn new(config: &AppConfig, connection: Arc<Connection>) -> Self {
        let client = Arc::new(EditorClient::new(
            connection.clone(),
            config.client.settings_section.clone(),
            config.defaults.clone(),
        ));
        let executor = Arc::new(ShellExecutor::from_config(
            &config.execution,
            client.clone(),
        ));
        let documents = DocumentStore::new();

        let context = CommandContext::new(
            config,
            client.clone(),
            client.clone(),
            client.clone(),
            executor.clone(),
        );
        let code_actions = CodeActionService::new(
            documents.clone(),
            client.clone(),
            config.client.command_prefix.clone(),
        );
        let hover = HoverService::new(
            documents.clone(),
            client.clone(),
            client.clone(),
            executor,
            context.commands.clone(),
        );

        Self {
            connection,
            client,
            documents,
            registry: CommandRegistry::with_default_handlers(),
            context,
            code_actions,
            hover,
        }
    }

    pub fn capabilities(&self) -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
            code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
            hover_provider: Some(HoverProviderCapability::Simple(true)),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: self.registry.command_names(&self.context),
                work_done_progress_options: Default::default(),
            }),
            ..Default::default()
        }
    }

    /// Answer one request and send the response
    pub async fn handle_request(self: Arc<Self>, id: Value, method: String, params: Value) {
        let sent = match self.dispatch(&method, params).await {
            Ok(result) => self.connection.send_response(id, result).await,
            Err(error) => {
                warn!(method = %method, code = error.code, error = %error.message, "Request failed");
                self.connection.send_error(id, error.code, error.message).await
            }
        };
        if let Err(e) = sent {
            log_error!(e, "Failed to send response", method = method.as_str());
        }
    }

    async fn dispatch(&self, method: &str, raw: Value) -> Result<Value, RequestError> {
        match method {
            "initialize" => {
                let init: InitializeParams = params(raw)?;
                self.client.set_initial_root(initial_root(&init));
                Ok(json!({
                    "capabilities": self.capabilities(),
                    "serverInfo": {
                        "name": "refactor-ls",
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                }))
            }
            "shutdown" => Ok(Value::Null),
            "textDocument/codeAction" => {
                let request: CodeActionParams = params(raw)?;
                let actions = self.code_actions.code_actions(&request).await?;
                Ok(serde_json::to_value(actions).map_err(ServerError::from)?)
            }
            "textDocument/hover" => {
                let request: HoverParams = params(raw)?;
                let hover = self.hover.hover(&request).await;
                Ok(serde_json::to_value(hover).map_err(ServerError::from)?)
            }
            "workspace/executeCommand" => {
                let request: ExecuteCommandParams = params(raw)?;
                // The registry shows failures to the user before they are returned
                Ok(self.registry.execute(&self.context, request).await?)
            }
            _ => Err(RequestError {
                code: METHOD_NOT_FOUND,
                message: format!("Method not found: {}", method),
            }),
        }
    }

    /// Handle a notification; runs inline so document updates stay ordered
    pub async fn handle_notification(&self, method: &str, raw: Value) {
        if let Err(e) = self.apply_notification(method, raw).await {
            log_error!(e, "Failed to handle notification", method = method);
        }
    }

    async fn apply_notification(&self, method: &str, raw: Value) -> ServerResult<()> {
        match method {
            "initialized" => {
                info!("Client initialized");
                self.client
                    .show_message(MessageType::INFO, "Language server started".to_string())
                    .await;
            }
            "textDocument/didOpen" => {
                self.documents
                    .open(serde_json::from_value::<DidOpenTextDocumentParams>(raw)?);
            }
            "textDocument/didChange" => {
                self.documents
                    .change(serde_json::from_value::<DidChangeTextDocumentParams>(raw)?);
            }
            "textDocument/didClose" => {
                self.documents
                    .close(serde_json::from_value::<DidCloseTextDocumentParams>(raw)?);
            }
            _ => debug!(method = %method, "Ignoring notification"),
        }
        Ok(())
    }
}

#[allow(deprecated)]
fn initial_root(params: &InitializeParams) -> Option<String> {
    params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .map(|folder| folder.uri.as_str().to_string())
        .or_else(|| params.root_uri.as_ref().map(|uri| uri.as_str().to_string()))
}

/// Serve LSP on the given streams until `exit` or end of input
pub async fn serve<R, W>(reader: R, writer: W, config: &AppConfig) -> ServerResult<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let connection = Connection::spawn(
        writer,
        Duration::from_secs(config.client.request_timeout_seconds),
    );
    let backend = Arc::new(Backend::new(config, connection.clone()));
    let mut reader = BufReader::new(reader);

    loop {
        let message = match read_message(&mut reader).await {
            Ok(Some(message)) => message,
            Ok(None) => {
                info!("Client closed the connection");
                break;
            }
            Err(e @ ServerError::Parse { .. }) => {
                log_error!(e, "Discarding malformed message");
                continue;
            }
            Err(e) => return Err(e),
        };

        match Incoming::from_value(message) {
            Ok(Incoming::Request { id, method, params }) => {
                let span = request_span(&id.to_string(), &method);
                tokio::spawn(
                    backend
                        .clone()
                        .handle_request(id, method, params)
                        .instrument(span),
                );
            }
            Ok(Incoming::Notification { method, .. }) if method == "exit" => {
                info!("Exit requested");
                break;
            }
            Ok(Incoming::Notification { method, params }) => {
                backend.handle_notification(&method, params).await;
            }
            Ok(Incoming::Response { id, result }) => connection.complete(&id, result).await,
            Err(e) => log_error!(e, "Discarding unclassifiable message"),
        }
    }

    Ok(())
}
