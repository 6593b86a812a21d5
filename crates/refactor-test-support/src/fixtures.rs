//! Sample stdout of the refactoring tool

/// A bare change list replacing `(0,0)-(0,5)` of `src/main.rs` with `foo`
pub const CHANGE_LIST_STDOUT: &str = r#"[{"byte_start":0,"byte_end":5,"char_start":0,"char_end":5,"line_start":0,"line_end":0,"file_name":"src/main.rs","replacement":"foo"}]"#;

/// The same change reported by the library and the test compilation of one crate
pub const DUPLICATE_CRATE_STREAM_STDOUT: &str = concat!(
    r#"Crate:{"crate_name":"app","is_test":false,"replacements":[{"byte_start":28,"byte_end":31,"char_start":13,"char_end":16,"line_start":1,"line_end":1,"file_name":"src/main.rs","replacement":"Box<u32>"}],"errors":[]}"#,
    "\n",
    r#"Crate:{"crate_name":"app","is_test":true,"replacements":[{"byte_start":28,"byte_end":31,"char_start":13,"char_end":16,"line_start":1,"line_end":1,"file_name":"src/main.rs","replacement":"Box<u32>"}],"errors":[]}"#,
    "\n"
);

/// Two compilation units; the second repeats the first's change
pub const STRUCTURED_STDOUT: &str = r#"{
  "candidates": [],
  "changes": [
    [
      {"byte_start":28,"byte_end":31,"char_start":13,"char_end":16,"line_start":1,"line_end":1,"file_name":"src/main.rs","replacement":"Box<u32>"},
      {"byte_start":60,"byte_end":61,"char_start":14,"char_end":15,"line_start":4,"line_end":4,"file_name":"src/main.rs","replacement":"Box::new(1)"}
    ],
    [
      {"byte_start":28,"byte_end":31,"char_start":13,"char_end":16,"line_start":1,"line_end":1,"file_name":"src/main.rs","replacement":"Box<u32>"}
    ]
  ],
  "errors": []
}"#;

/// A structured result carrying a tool error alongside changes
pub const STRUCTURED_ERROR_STDOUT: &str = r#"{
  "candidates": [],
  "changes": [
    [{"byte_start":0,"byte_end":5,"char_start":0,"char_end":5,"line_start":0,"line_end":0,"file_name":"src/main.rs","replacement":"foo"}]
  ],
  "errors": [
    {"is_error": true, "kind": "InternalError", "message": "Cannot box a field of a tuple-like enum variant", "codes": []},
    {"is_error": true, "kind": "InternalError", "message": "second error", "codes": []}
  ]
}"#;

/// Hover-type query output
pub const HOVER_TYPE_STDOUT: &str =
    r#"[{"type":"std::vec::Vec<\n        i32,\n>","file_name":"src/main.rs"}]"#;
