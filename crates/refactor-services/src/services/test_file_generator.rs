//! Generation of refactoring test-case files
//!
//! For `dir/case.rs` a `dir/case.json` is written next to it describing the
//! invocation and its expected outcome.

use super::edit_mapper::new_file_edits;
use lsp_types::{ApplyWorkspaceEditParams, Uri};
use refactor_foundation::model::GenerateTestFileArgs;
use refactor_foundation::{ServerError, ServerResult};
use serde::Serialize;

pub const GENERATE_TEST_FILE_LABEL: &str = "refactor.generate_test_file";

#[derive(Serialize)]
struct TestCase<'a> {
    file: String,
    args: TestCaseArgs<'a>,
    expected: Expected,
}

#[derive(Serialize)]
struct TestCaseArgs<'a> {
    refactoring: &'a str,
    selection: &'a str,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Expected {
    Failure { code: i32, stderr: &'static str },
    Success { code: i32, stdout_file: String },
}

/// URI of the test-case file for a Rust source URI
pub fn test_file_uri(file_uri: &str) -> Option<String> {
    file_uri
        .strip_suffix(".rs")
        .map(|stem| format!("{}.json", stem))
}

/// File stem of a Rust source URI, e.g. `case` for `file:///t/case.rs`
fn test_name(file_uri: &str) -> &str {
    let stem = file_uri.strip_suffix(".rs").unwrap_or(file_uri);
    stem.rsplit('/').next().unwrap_or(stem)
}

/// Tab-indented JSON describing the test case
pub fn test_file_content(args: &GenerateTestFileArgs) -> ServerResult<String> {
    let name = test_name(&args.file_uri);
    let case = TestCase {
        file: format!("{}.rs", name),
        args: TestCaseArgs {
            refactoring: &args.refactoring,
            selection: &args.selection,
        },
        expected: if args.should_fail {
            Expected::Failure {
                code: 2,
                stderr: "todo",
            }
        } else {
            Expected::Success {
                code: 0,
                stdout_file: format!("{}_after.rs", name),
            }
        },
    };

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    case.serialize(&mut serializer)?;

    String::from_utf8(buffer).map_err(|e| ServerError::internal(e.to_string()))
}

/// Edits creating the test-case file; none for sources that are not `.rs`
pub fn generate_test_file_edits(
    args: &GenerateTestFileArgs,
) -> ServerResult<Vec<ApplyWorkspaceEditParams>> {
    let Some(json_uri) = test_file_uri(&args.file_uri) else {
        return Ok(Vec::new());
    };

    let uri: Uri = json_uri
        .parse()
        .map_err(|e| ServerError::internal(format!("Failed to parse URI: {}", e)))?;

    Ok(new_file_edits(
        uri,
        test_file_content(args)?,
        GENERATE_TEST_FILE_LABEL,
    ))
}
