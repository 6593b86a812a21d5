//! Output records emitted by the external refactoring tool

use lsp_types::{Position, Range};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single textual replacement reported by the refactoring tool.
///
/// Line and character offsets are already in editor addressing; the byte
/// offsets are kept for completeness but are not needed to build edits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Change {
    pub file_name: String,
    pub byte_start: u32,
    pub byte_end: u32,
    pub char_start: u32,
    pub char_end: u32,
    pub line_start: u32,
    pub line_end: u32,
    pub replacement: String,
}

impl Change {
    /// The editor range this change replaces
    pub fn range(&self) -> Range {
        Range {
            start: Position {
                line: self.line_start,
                character: self.char_start,
            },
            end: Position {
                line: self.line_end,
                character: self.char_end,
            },
        }
    }

    /// Whether two changes describe the same edit.
    ///
    /// Compares the file, the four line/character offsets and the replacement
    /// text. Byte offsets are ignored.
    pub fn is_same_edit(&self, other: &Change) -> bool {
        self.file_name == other.file_name
            && self.line_start == other.line_start
            && self.char_start == other.char_start
            && self.line_end == other.line_end
            && self.char_end == other.char_end
            && self.replacement == other.replacement
    }
}

/// An error entry reported by the tool alongside (or instead of) changes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefactorError {
    pub is_error: bool,
    #[serde(default)]
    pub kind: String,
    pub message: String,
    #[serde(default)]
    pub codes: Vec<String>,
}

/// Per-compilation-unit output of the legacy NDJSON stream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrateOutput {
    pub crate_name: String,
    pub is_test: bool,
    #[serde(default)]
    pub replacements: Vec<Change>,
    #[serde(default)]
    pub errors: Vec<RefactorError>,
}

/// Container emitted by current versions of the tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RefactorOutputs {
    #[serde(default)]
    pub candidates: Vec<Value>,
    #[serde(default)]
    pub changes: Vec<Vec<Change>>,
    #[serde(default)]
    pub errors: Vec<RefactorError>,
}

/// Which of the tool's output shapes to expect on stdout
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    /// One `RefactorOutputs` object
    #[default]
    Structured,
    /// One `CrateOutput` object per line, optionally prefixed with `Crate:`
    CrateStream,
    /// A bare JSON array of changes
    ChangeList,
}

/// Captured result of one external command invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ShellOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(byte_start: u32, replacement: &str) -> Change {
        Change {
            file_name: "src/main.rs".to_string(),
            byte_start,
            byte_end: byte_start + 3,
            char_start: 13,
            char_end: 16,
            line_start: 1,
            line_end: 1,
            replacement: replacement.to_string(),
        }
    }

    #[test]
    fn test_change_range_uses_line_and_char_offsets() {
        let range = change(28, "Box<u32>").range();
        assert_eq!(range.start, Position::new(1, 13));
        assert_eq!(range.end, Position::new(1, 16));
    }

    #[test]
    fn test_same_edit_ignores_byte_offsets() {
        assert!(change(28, "Box<u32>").is_same_edit(&change(40, "Box<u32>")));
        assert!(!change(28, "Box<u32>").is_same_edit(&change(28, "Box<u64>")));
    }

    #[test]
    fn test_refactor_error_defaults_missing_fields() {
        let error: RefactorError =
            serde_json::from_str(r#"{"is_error":true,"message":"boom"}"#).unwrap();
        assert!(error.is_error);
        assert!(error.kind.is_empty());
        assert!(error.codes.is_empty());
    }
}
