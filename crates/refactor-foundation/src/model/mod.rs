//! Request, settings and tool-output data model

pub mod args;
pub mod outputs;
pub mod refactorings;
pub mod settings;

pub use args::{GenerateTestFileArgs, RefactorArgs};
pub use outputs::{
    Change, CrateOutput, OutputFormat, RefactorError, RefactorOutputs, ShellOutput,
};
pub use refactorings::list_refactorings;
pub use settings::ExtensionSettings;
