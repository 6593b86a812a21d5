//! `workspace/executeCommand` handlers

pub mod candidates_command;
pub mod cargo_check_command;
pub mod command_handler;
pub mod command_registry;
pub mod generate_test_file_command;
pub mod refactor_command;

pub use candidates_command::CandidatesCommand;
pub use cargo_check_command::CargoCheckCommand;
pub use command_handler::CommandHandler;
pub use command_registry::CommandRegistry;
pub use generate_test_file_command::GenerateTestFileCommand;
pub use refactor_command::RefactorCommand;
