//! Services behind the refactoring commands

pub mod change_merger;
pub mod command_builder;
pub mod edit_mapper;
pub mod output_parser;
pub mod shell_executor;
pub mod test_file_generator;
pub mod workspace_paths;

pub use change_merger::{merge_changes, split_change_sets};
pub use command_builder::{CommandBuilder, Launcher};
pub use edit_mapper::{map_changes_to_workspace_edit, new_file_edits};
pub use output_parser::{parse_output, ParsedOutput};
pub use shell_executor::ShellExecutor;
pub use test_file_generator::{generate_test_file_edits, test_file_uri, GENERATE_TEST_FILE_LABEL};
pub use workspace_paths::WorkspaceRoot;
