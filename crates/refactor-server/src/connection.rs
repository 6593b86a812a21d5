//! Content-Length framed JSON-RPC over a byte stream
//!
//! A single writer task owns the output stream; everything else sends
//! through a channel. Responses to our own requests are matched to their
//! callers by id.

use refactor_foundation::{ServerError, ServerResult};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Buffer size for the outgoing message channel
const CHANNEL_BUFFER_SIZE: usize = 1000;

pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;
/// LSP `RequestFailed`: well-formed request whose processing failed
pub const REQUEST_FAILED: i64 = -32803;

type PendingRequests = Arc<Mutex<HashMap<i64, oneshot::Sender<Result<Value, String>>>>>;

/// A message read from the peer
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    Request {
        id: Value,
        method: String,
        params: Value,
    },
    Notification {
        method: String,
        params: Value,
    },
    Response {
        id: Value,
        result: Result<Value, String>,
    },
}

impl Incoming {
    /// Classify a decoded JSON-RPC message
    pub fn from_value(mut message: Value) -> ServerResult<Self> {
        let params = message.get_mut("params").map(Value::take).unwrap_or(Value::Null);
        let id = message.get_mut("id").map(Value::take);

        match (message.get("method").and_then(Value::as_str), id) {
            (Some(method), Some(id)) => Ok(Self::Request {
                id,
                method: method.to_string(),
                params,
            }),
            (Some(method), None) => Ok(Self::Notification {
                method: method.to_string(),
                params,
            }),
            (None, Some(id)) => {
                let result = match (message.get("result"), message.get("error")) {
                    (_, Some(error)) => Err(error
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or("Unknown error")
                        .to_string()),
                    (Some(result), None) => Ok(result.clone()),
                    (None, None) => Ok(Value::Null),
                };
                Ok(Self::Response { id, result })
            }
            (None, None) => Err(ServerError::lsp(format!(
                "Message is neither request, notification nor response: {}",
                message
            ))),
        }
    }
}

/// Parse a `Content-Length` header line
fn parse_content_length(line: &str) -> Option<usize> {
    let (name, value) = line.split_once(':')?;
    if name.trim().eq_ignore_ascii_case("Content-Length") {
        value.trim().parse().ok()
    } else {
        None
    }
}

/// Read one framed message; `None` at end of stream
pub async fn read_message<R>(reader: &mut R) -> ServerResult<Option<Value>>
where
    R: AsyncBufRead + Unpin,
{
    let mut content_length = None;
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        let header = line.trim_end();
        if header.is_empty() {
            if content_length.is_some() {
                break;
            }
            continue;
        }
        if let Some(length) = parse_content_length(header) {
            content_length = Some(length);
        }
        // Other headers (Content-Type) are skipped
    }

    let Some(length) = content_length else {
        return Ok(None);
    };
    let mut buffer = vec![0u8; length];
    reader.read_exact(&mut buffer).await?;
    Ok(Some(serde_json::from_slice(&buffer)?))
}

/// Write one framed message
pub async fn write_message<W>(writer: &mut W, message: &Value) -> ServerResult<()>
where
    W: AsyncWrite + Unpin,
{
    let content = serde_json::to_string(message)?;
    let frame = format!("Content-Length: {}\r\n\r\n{}", content.len(), content);
    writer.write_all(frame.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Sending half of the connection, shared by every handler
pub struct Connection {
    message_tx: mpsc::Sender<Value>,
    pending_requests: PendingRequests,
    next_id: AtomicI64,
    request_timeout: Duration,
}

impl Connection {
    /// Create the connection and spawn the task writing to `writer`
    pub fn spawn<W>(writer: W, request_timeout: Duration) -> Arc<Self>
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (message_tx, mut message_rx) = mpsc::channel::<Value>(CHANNEL_BUFFER_SIZE);

        tokio::spawn(async move {
            let mut writer = writer;
            while let Some(message) = message_rx.recv().await {
                if let Err(e) = write_message(&mut writer, &message).await {
                    tracing::error!(
                        error_category = "lsp_communication",
                        error = %e,
                        "Failed to write to client"
                    );
                    break;
                }
            }
            debug!("Connection writer finished");
        });

        Arc::new(Self {
            message_tx,
            pending_requests: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicI64::new(1),
            request_timeout,
        })
    }

    async fn send(&self, message: Value) -> ServerResult<()> {
        self.message_tx
            .send(message)
            .await
            .map_err(|e| ServerError::lsp(format!("Connection closed: {}", e)))
    }

    /// Send a request to the client and await its result
    pub async fn send_request(&self, method: &str, params: Value) -> ServerResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (response_tx, response_rx) = oneshot::channel();
        self.pending_requests.lock().await.insert(id, response_tx);

        debug!(lsp_method = %method, lsp_request_id = id, "Sending request to client");
        let message = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });
        if let Err(e) = self.send(message).await {
            self.pending_requests.lock().await.remove(&id);
            return Err(e);
        }

        let start_time = Instant::now();
        match timeout(self.request_timeout, response_rx).await {
            Ok(Ok(Ok(result))) => {
                debug!(
                    lsp_method = %method,
                    lsp_request_id = id,
                    duration_ms = start_time.elapsed().as_millis() as u64,
                    "Received response from client"
                );
                Ok(result)
            }
            Ok(Ok(Err(error))) => Err(ServerError::lsp(format!("{} failed: {}", method, error))),
            Ok(Err(_)) => {
                self.pending_requests.lock().await.remove(&id);
                Err(ServerError::lsp("Response channel closed"))
            }
            Err(_) => {
                warn!(
                    lsp_method = %method,
                    lsp_request_id = id,
                    timeout_ms = self.request_timeout.as_millis() as u64,
                    "Client request timeout"
                );
                self.pending_requests.lock().await.remove(&id);
                Err(ServerError::lsp(format!("{} timed out", method)))
            }
        }
    }

    pub async fn send_notification(&self, method: &str, params: Value) -> ServerResult<()> {
        self.send(json!({ "jsonrpc": "2.0", "method": method, "params": params }))
            .await
    }

    pub async fn send_response(&self, id: Value, result: Value) -> ServerResult<()> {
        self.send(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
            .await
    }

    pub async fn send_error(&self, id: Value, code: i64, message: String) -> ServerResult<()> {
        self.send(json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": code, "message": message }
        }))
        .await
    }

    /// Hand a response from the client to the request waiting for it
    pub async fn complete(&self, id: &Value, result: Result<Value, String>) {
        let Some(id_num) = id.as_i64() else {
            warn!(id = %id, "Response with non-numeric id");
            return;
        };
        let sender = self.pending_requests.lock().await.remove(&id_num);
        match sender {
            Some(sender) => {
                let _ = sender.send(result);
            }
            None => warn!(
                id = id_num,
                "Received response for unknown request ID (already handled or timeout)"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[test]
    fn test_parse_content_length() {
        assert_eq!(parse_content_length("Content-Length: 42"), Some(42));
        assert_eq!(parse_content_length("content-length:7"), Some(7));
        assert_eq!(parse_content_length("Content-Type: utf-8"), None);
    }

    #[tokio::test]
    async fn test_read_message_skips_extra_headers() {
        let body = r#"{"jsonrpc":"2.0","method":"initialized","params":{}}"#;
        let raw = format!(
            "Content-Length: {}\r\nContent-Type: application/vscode-jsonrpc; charset=utf-8\r\n\r\n{}",
            body.len(),
            body
        );
        let mut reader = BufReader::new(raw.as_bytes());

        let message = read_message(&mut reader).await.unwrap().unwrap();
        assert_eq!(message["method"], "initialized");
        assert!(read_message(&mut reader).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let mut buffer = Vec::new();
        let message = json!({"jsonrpc": "2.0", "id": 1, "result": null});
        write_message(&mut buffer, &message).await.unwrap();

        let mut reader = BufReader::new(buffer.as_slice());
        assert_eq!(read_message(&mut reader).await.unwrap().unwrap(), message);
    }

    #[test]
    fn test_classify_messages() {
        let request = Incoming::from_value(json!({"id": 3, "method": "shutdown"})).unwrap();
        assert!(matches!(request, Incoming::Request { ref method, .. } if method == "shutdown"));

        let notification = Incoming::from_value(json!({"method": "exit"})).unwrap();
        assert!(matches!(notification, Incoming::Notification { .. }));

        let error = Incoming::from_value(json!({"id": 1, "error": {"code": 1, "message": "no"}}))
            .unwrap();
        assert_eq!(
            error,
            Incoming::Response {
                id: json!(1),
                result: Err("no".to_string())
            }
        );

        assert!(Incoming::from_value(json!({"jsonrpc": "2.0"})).is_err());
    }

    #[tokio::test]
    async fn test_request_times_out_and_is_forgotten() {
        let (client, _server) = tokio::io::duplex(4096);
        let connection = Connection::spawn(client, Duration::from_millis(50));

        let result = connection.send_request("workspace/configuration", json!({})).await;
        assert!(result.is_err());
        assert!(connection.pending_requests.lock().await.is_empty());
    }
}
