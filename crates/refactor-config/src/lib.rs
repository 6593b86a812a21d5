//! Configuration and logging for the refactoring language server

pub mod config;
pub mod logging;

pub use config::{
    AppConfig, ClientConfig, ExecutionConfig, LogFormat, LoggingConfig, CONFIG_FILE_NAMES,
    ENV_PREFIX,
};
