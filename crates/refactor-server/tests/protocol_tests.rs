//! Full LSP sessions over an in-memory stream

use pretty_assertions::assert_eq;
use refactor_config::AppConfig;
use refactor_foundation::model::OutputFormat;
use refactor_server::connection::{read_message, write_message};
use refactor_server::serve;
use serde_json::{json, Value};
use tokio::io::{split, BufReader, DuplexStream, ReadHalf, WriteHalf};
use tokio::task::JoinHandle;

struct TestClient {
    reader: BufReader<ReadHalf<DuplexStream>>,
    writer: WriteHalf<DuplexStream>,
    server: JoinHandle<()>,
    /// Notifications received from the server, in order
    notifications: Vec<Value>,
}

impl TestClient {
    fn start(config: AppConfig) -> Self {
        let (client_side, server_side) = tokio::io::duplex(64 * 1024);
        let (server_reader, server_writer) = split(server_side);
        let server = tokio::spawn(async move {
            serve(server_reader, server_writer, &config).await.unwrap();
        });
        let (reader, writer) = split(client_side);
        Self {
            reader: BufReader::new(reader),
            writer,
            server,
            notifications: Vec::new(),
        }
    }

    async fn notify(&mut self, method: &str, params: Value) {
        let message = json!({"jsonrpc": "2.0", "method": method, "params": params});
        write_message(&mut self.writer, &message).await.unwrap();
    }

    /// Send a request and answer server requests with `respond` until its
    /// response arrives
    async fn request<F>(&mut self, id: i64, method: &str, params: Value, respond: F) -> Value
    where
        F: Fn(&str, &Value) -> Value,
    {
        let message = json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params});
        write_message(&mut self.writer, &message).await.unwrap();

        loop {
            let message = read_message(&mut self.reader).await.unwrap().unwrap();
            match (message.get("method").and_then(Value::as_str), message.get("id")) {
                (Some(method), Some(server_id)) => {
                    let result = respond(method, &message["params"]);
                    let reply = json!({"jsonrpc": "2.0", "id": server_id, "result": result});
                    write_message(&mut self.writer, &reply).await.unwrap();
                }
                (Some(_), None) => self.notifications.push(message),
                (None, Some(response_id)) if *response_id == json!(id) => return message,
                _ => panic!("unexpected message: {}", message),
            }
        }
    }

    fn shown_messages(&self) -> Vec<String> {
        self.notifications
            .iter()
            .filter(|n| n["method"] == "window/showMessage")
            .filter_map(|n| n["params"]["message"].as_str().map(String::from))
            .collect()
    }

    async fn exit(mut self) {
        self.request(999, "shutdown", Value::Null, no_requests).await;
        self.notify("exit", Value::Null).await;
        self.server.await.unwrap();
    }
}

fn no_requests(method: &str, _params: &Value) -> Value {
    panic!("unexpected server request: {}", method)
}

async fn initialize(client: &mut TestClient, root_uri: &str) -> Value {
    let response = client
        .request(
            1,
            "initialize",
            json!({"processId": null, "rootUri": root_uri, "capabilities": {}}),
            no_requests,
        )
        .await;
    client.notify("initialized", json!({})).await;
    response
}

#[tokio::test]
async fn test_initialize_advertises_commands() {
    let mut client = TestClient::start(AppConfig::default());
    let response = initialize(&mut client, "file:///ws").await;

    let capabilities = &response["result"]["capabilities"];
    assert_eq!(capabilities["hoverProvider"], json!(true));
    assert_eq!(capabilities["codeActionProvider"], json!(true));
    assert_eq!(
        capabilities["executeCommandProvider"]["commands"],
        json!([
            "mrefactor.candidates",
            "mrefactor.cargo_check",
            "mrefactor.generate_test_file",
            "mrefactor.refactor"
        ])
    );

    // The started notification precedes the shutdown response
    client.request(2, "shutdown", Value::Null, no_requests).await;
    assert_eq!(client.shown_messages(), vec!["Language server started"]);
    client.exit().await;
}

#[tokio::test]
async fn test_code_actions_for_open_document() {
    let mut client = TestClient::start(AppConfig::default());
    initialize(&mut client, "file:///ws").await;
    client
        .notify(
            "textDocument/didOpen",
            json!({"textDocument": {
                "uri": "file:///ws/src/main.rs",
                "languageId": "rust",
                "version": 1,
                "text": "fn main() {\n    let x = 1;\n}\n"
            }}),
        )
        .await;

    let response = client
        .request(
            2,
            "textDocument/codeAction",
            json!({
                "textDocument": {"uri": "file:///ws/src/main.rs"},
                "range": {"start": {"line": 1, "character": 4}, "end": {"line": 1, "character": 14}},
                "context": {"diagnostics": []}
            }),
            |method, _| {
                assert_eq!(method, "workspace/configuration");
                json!([{"isUnsafeRefactoringShown": false}])
            },
        )
        .await;

    let titles: Vec<&str> = response["result"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|action| action["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Refactor - box-field", "Refactor - extract-method"]);
    assert_eq!(
        response["result"][0]["command"]["arguments"][0]["selection"],
        json!("16:26")
    );
    client.exit().await;
}

#[tokio::test]
async fn test_unknown_command_is_shown_then_rejected() {
    let mut client = TestClient::start(AppConfig::default());
    initialize(&mut client, "file:///ws").await;

    let response = client
        .request(
            2,
            "workspace/executeCommand",
            json!({"command": "mrefactor.rename", "arguments": []}),
            no_requests,
        )
        .await;

    assert_eq!(response["error"]["code"], json!(-32803));
    let shown = client.shown_messages();
    assert_eq!(shown.len(), 2);
    assert!(shown[1].starts_with("invalid args: Unknown command: 'mrefactor.rename'"));
    client.exit().await;
}

#[tokio::test]
async fn test_unknown_method_is_rejected() {
    let mut client = TestClient::start(AppConfig::default());
    initialize(&mut client, "file:///ws").await;

    let response = client
        .request(2, "textDocument/rename", json!({}), no_requests)
        .await;
    assert_eq!(response["error"]["code"], json!(-32601));
    client.exit().await;
}

#[cfg(unix)]
#[tokio::test]
async fn test_refactor_command_applies_tool_output() {
    use refactor_test_support::fixtures;
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::TempDir::new().unwrap();
    let tool = dir.path().join("fake-refactor");
    std::fs::write(
        &tool,
        format!("#!/bin/sh\necho '{}'\n", fixtures::CHANGE_LIST_STDOUT),
    )
    .unwrap();
    std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

    let root_uri = format!("file://{}", dir.path().display());
    let file_uri = format!("{}/src/main.rs", root_uri);
    let tool_path = tool.display().to_string();

    let mut config = AppConfig::default();
    config.execution.output_format = OutputFormat::ChangeList;
    let mut client = TestClient::start(config);
    initialize(&mut client, &root_uri).await;

    let applied_edits = std::sync::Mutex::new(Vec::new());
    let response = client
        .request(
            2,
            "workspace/executeCommand",
            json!({
                "command": "mrefactor.refactor",
                "arguments": [{
                    "file": file_uri,
                    "version": 1,
                    "refactoring": "extract-block",
                    "selection": "0:5",
                    "unsafe": false
                }]
            }),
            |method, params| match method {
                "workspace/configuration" => json!([{"refactoringBinaryPath": tool_path}]),
                "workspace/workspaceFolders" => Value::Null,
                "workspace/applyEdit" => {
                    applied_edits.lock().unwrap().push(params.clone());
                    json!({"applied": true})
                }
                other => panic!("unexpected server request: {}", other),
            },
        )
        .await;

    assert_eq!(response["result"], Value::Null);
    let applied_edits = applied_edits.into_inner().unwrap();
    assert_eq!(applied_edits.len(), 1);
    let document = &applied_edits[0]["edit"]["documentChanges"][0];
    assert_eq!(document["textDocument"]["uri"], json!(file_uri));
    assert_eq!(document["edits"][0]["newText"], json!("foo"));
    assert!(client
        .shown_messages()
        .contains(&"Applied: extract-block".to_string()));
    client.exit().await;
}
