//! Tests for error handling

use pretty_assertions::assert_eq;
use refactor_foundation::{ServerError, ServerResult};
use std::io;

#[test]
fn test_error_chain() {
    fn inner_function() -> Result<(), io::Error> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "Access denied"))
    }

    fn outer_function() -> ServerResult<()> {
        inner_function()?;
        Ok(())
    }

    match outer_function().unwrap_err() {
        ServerError::Io(io_error) => {
            assert_eq!(io_error.kind(), io::ErrorKind::PermissionDenied);
        }
        other => panic!("Expected IO error, got {other:?}"),
    }
}

#[test]
fn test_user_facing_messages() {
    assert_eq!(
        ServerError::invalid_binary_path("").to_string(),
        "'' is not a path"
    );
    assert_eq!(
        ServerError::ShellAlreadyExecuting.to_string(),
        "Shell already executing"
    );
    assert_eq!(
        ServerError::refactoring("box-field", "field is not a struct field").user_message(),
        "field is not a struct field"
    );

    let failed = ServerError::ToolFailed {
        exit_code: 101,
        stdout: "out".to_string(),
        stderr: "err".to_string(),
    };
    assert_eq!(failed.to_string(), "Refactoring failed. \nstderr: err\nstdout: out");
}

#[test]
fn test_categories_and_client_errors() {
    let cases = [
        (ServerError::invalid_request("[]"), "invalid_request", true),
        (ServerError::invalid_binary_path(""), "invalid_binary_path", true),
        (ServerError::unknown_file_path("a.rs"), "unknown_file_path", true),
        (ServerError::ShellAlreadyExecuting, "shell_already_executing", true),
        (ServerError::parse("eof"), "parse_error", false),
        (ServerError::refactoring("k", "m"), "refactoring_error", false),
        (ServerError::config("bad"), "config_error", false),
        (ServerError::internal("oops"), "internal_error", false),
    ];

    for (error, category, client) in cases {
        assert_eq!(error.category(), category);
        assert_eq!(error.is_client_error(), client, "{category}");
    }
}

#[test]
fn test_json_errors_become_parse_errors() {
    let err: ServerError = serde_json::from_str::<serde_json::Value>("{not json")
        .unwrap_err()
        .into();
    assert!(matches!(err, ServerError::Parse { .. }));
}

#[test]
fn test_error_serializes_with_type_tag() {
    let value = serde_json::to_value(ServerError::unknown_file_path("src/lib.rs")).unwrap();
    assert_eq!(value["type"], "UnknownFilePath");
    assert_eq!(value["details"]["file"], "src/lib.rs");
}
