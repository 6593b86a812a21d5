pub mod services;

// Re-export commonly used types at crate root for convenience
pub use services::{
    generate_test_file_edits, map_changes_to_workspace_edit, merge_changes, new_file_edits,
    parse_output, split_change_sets, test_file_uri, CommandBuilder, Launcher, ParsedOutput,
    ShellExecutor, WorkspaceRoot, GENERATE_TEST_FILE_LABEL,
};
