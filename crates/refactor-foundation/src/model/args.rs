//! Command argument payloads carried inside `workspace/executeCommand`

use crate::error::{ServerError, ServerResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Arguments of the refactor command.
///
/// Built when a code action is offered, sent to the client as the command's
/// first argument and read back once when the command executes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefactorArgs {
    /// Document URI
    pub file: String,
    #[serde(default)]
    pub version: Option<i32>,
    pub refactoring: String,
    /// `<start>:<end>` selection
    pub selection: String,
    #[serde(rename = "unsafe", default)]
    pub is_unsafe: bool,
}

impl RefactorArgs {
    /// Read the refactor arguments from a positional command argument list.
    ///
    /// The first argument must be present and carry a non-empty `file`.
    pub fn from_arguments(arguments: &[Value]) -> ServerResult<Self> {
        let invalid = || {
            ServerError::invalid_request(
                serde_json::to_string(arguments).unwrap_or_else(|_| "<unprintable>".to_string()),
            )
        };

        let first = arguments.first().filter(|v| !v.is_null()).ok_or_else(invalid)?;
        let args: RefactorArgs = serde_json::from_value(first.clone()).map_err(|_| invalid())?;
        if args.file.is_empty() {
            return Err(invalid());
        }
        Ok(args)
    }
}

/// Arguments of the generate-test-file command
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateTestFileArgs {
    pub file_uri: String,
    pub refactoring: String,
    pub selection: String,
    pub should_fail: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_refactor_args_round_trip_uses_unsafe_key() {
        let args = RefactorArgs {
            file: "file:///ws/src/main.rs".to_string(),
            version: Some(3),
            refactoring: "box-field".to_string(),
            selection: "10:20".to_string(),
            is_unsafe: true,
        };
        let value = serde_json::to_value(&args).unwrap();
        assert_eq!(value["unsafe"], json!(true));
        assert_eq!(RefactorArgs::from_arguments(&[value]).unwrap(), args);
    }

    #[test]
    fn test_missing_first_argument_is_rejected() {
        let err = RefactorArgs::from_arguments(&[]).unwrap_err();
        assert!(matches!(err, ServerError::InvalidRequest { .. }));
        assert_eq!(err.to_string(), "invalid args: []");
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let arg = json!({"file": "", "refactoring": "extract-block", "selection": "1:2"});
        let err = RefactorArgs::from_arguments(&[arg]).unwrap_err();
        assert_eq!(err.category(), "invalid_request");
    }

    #[test]
    fn test_version_may_be_null() {
        let arg = json!({
            "file": "file:///ws/a.rs",
            "version": null,
            "refactoring": "extract-block",
            "selection": "1:2",
            "unsafe": false
        });
        let args = RefactorArgs::from_arguments(&[arg]).unwrap();
        assert_eq!(args.version, None);
        assert!(!args.is_unsafe);
    }
}
