use lsp_types::{
    DidOpenTextDocumentParams, HoverContents, HoverParams, MarkedString, Position,
    TextDocumentIdentifier, TextDocumentItem, TextDocumentPositionParams, Uri,
    WorkDoneProgressParams,
};
use refactor_foundation::model::ShellOutput;
use refactor_handlers::{DocumentStore, HoverService};
use refactor_services::CommandBuilder;
use refactor_test_support::fixtures;
use refactor_test_support::mocks::{
    settings_provider, workspace_accepting_edits, MockCommandRunner,
};
use refactor_test_support::settings_with_binary;
use std::sync::Arc;

fn uri() -> Uri {
    "file:///ws/src/main.rs".parse().unwrap()
}

fn documents() -> DocumentStore {
    let documents = DocumentStore::new();
    documents.open(DidOpenTextDocumentParams {
        text_document: TextDocumentItem {
            uri: uri(),
            language_id: "rust".to_string(),
            version: 1,
            text: "fn main() {\n    let v = vec![1];\n}\n".to_string(),
        },
    });
    documents
}

fn params(line: u32, character: u32) -> HoverParams {
    HoverParams {
        text_document_position_params: TextDocumentPositionParams {
            text_document: TextDocumentIdentifier { uri: uri() },
            position: Position::new(line, character),
        },
        work_done_progress_params: WorkDoneProgressParams::default(),
    }
}

fn service(hover_enabled: bool, runner: MockCommandRunner) -> HoverService {
    let mut settings = settings_with_binary("/opt/em-refactor/bin/cargo-em-refactor");
    settings.is_hover_enabled = hover_enabled;
    HoverService::new(
        documents(),
        Arc::new(settings_provider(settings)),
        Arc::new(workspace_accepting_edits("file:///ws")),
        Arc::new(runner),
        CommandBuilder::new("./target/refactorings"),
    )
}

#[tokio::test]
async fn test_hover_shows_collapsed_type() {
    let mut runner = MockCommandRunner::new();
    runner
        .expect_execute()
        .withf(|command, _| {
            command.contains("--file=src/main.rs") && command.ends_with("--selection=20:20")
        })
        .times(1)
        .returning(|_, _| {
            Ok(ShellOutput {
                exit_code: 0,
                stdout: fixtures::HOVER_TYPE_STDOUT.to_string(),
                stderr: String::new(),
            })
        });

    let hover = service(true, runner).hover(&params(1, 8)).await.unwrap();

    match hover.contents {
        HoverContents::Scalar(MarkedString::LanguageString(code)) => {
            assert_eq!(code.language, "rust");
            assert_eq!(code.value, "std::vec::Vec<\n i32,\n>");
        }
        other => panic!("unexpected hover contents: {:?}", other),
    }
    let range = hover.range.unwrap();
    assert_eq!(range.start, Position::new(1, 8));
    assert_eq!(range.end, Position::new(1, 8));
}

#[tokio::test]
async fn test_hover_disabled_runs_nothing() {
    let mut runner = MockCommandRunner::new();
    runner.expect_execute().never();

    assert!(service(false, runner).hover(&params(1, 8)).await.is_none());
}

#[tokio::test]
async fn test_hover_failure_yields_nothing() {
    let mut runner = MockCommandRunner::new();
    runner.expect_execute().returning(|_, _| {
        Ok(ShellOutput {
            exit_code: 1,
            stdout: String::new(),
            stderr: "error".to_string(),
        })
    });

    assert!(service(true, runner).hover(&params(1, 8)).await.is_none());
}
