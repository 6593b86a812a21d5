//! Server configuration

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use refactor_foundation::model::{ExtensionSettings, OutputFormat};
use refactor_foundation::{ServerError, ServerResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config files looked up in the working directory, first match wins
pub const CONFIG_FILE_NAMES: &[&str] = &["refactor-ls.toml", ".refactor-ls/config.toml"];

/// Prefix of environment overrides, e.g. `REFACTOR_LS__EXECUTION__TIMEOUT_SECONDS=30`
pub const ENV_PREFIX: &str = "REFACTOR_LS__";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub client: ClientConfig,
    /// Extension settings used when the client does not provide any
    #[serde(default)]
    pub defaults: ExtensionSettings,
}

/// Log output format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format for development
    #[default]
    Pretty,
    /// Structured JSON format for production
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    pub format: LogFormat,
}

/// How the external refactoring tool is run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Cargo target directory the tool builds into
    pub target_dir: String,
    /// Wall-clock limit for one tool invocation; unlimited when unset
    pub timeout_seconds: Option<u64>,
    /// Shape of the tool's stdout
    pub output_format: OutputFormat,
    /// Shell used to run command lines
    pub shell: String,
}

/// Editor client integration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// `workspace/configuration` section holding the extension settings
    pub settings_section: String,
    /// Prefix of executable command names, e.g. `mrefactor.refactor`
    pub command_prefix: String,
    /// Timeout for requests sent to the client
    pub request_timeout_seconds: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            target_dir: "./target/refactorings".to_string(),
            timeout_seconds: None,
            output_format: OutputFormat::Structured,
            shell: "sh".to_string(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            settings_section: "emRefactor".to_string(),
            command_prefix: "mrefactor".to_string(),
            request_timeout_seconds: 60,
        }
    }
}

impl AppConfig {
    /// Load configuration from the current directory and environment
    pub fn load() -> ServerResult<Self> {
        Self::load_from(None)
    }

    /// Load configuration, preferring an explicit config file over the
    /// files searched in the current directory
    pub fn load_from(explicit: Option<&Path>) -> ServerResult<Self> {
        let cwd = std::env::current_dir()?;
        Self::load_in(&cwd, explicit)
    }

    /// Load configuration relative to `dir`.
    ///
    /// Priority order (highest to lowest):
    /// 1. Environment variables (`REFACTOR_LS__*`)
    /// 2. The explicit config file, or the first of [`CONFIG_FILE_NAMES`] in `dir`
    /// 3. Default values
    pub fn load_in(dir: &Path, explicit: Option<&Path>) -> ServerResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        if let Some(path) = Self::config_file(dir, explicit)? {
            tracing::info!(path = %path.display(), "Loading TOML configuration");
            figment = figment.merge(Toml::file(path));
        }

        let figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: AppConfig = figment
            .extract()
            .map_err(|e| ServerError::config(format!("Failed to load configuration: {}", e)))?;

        config.validate()?;

        tracing::debug!(
            target_dir = %config.execution.target_dir,
            output_format = ?config.execution.output_format,
            timeout_seconds = ?config.execution.timeout_seconds,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    fn config_file(dir: &Path, explicit: Option<&Path>) -> ServerResult<Option<PathBuf>> {
        if let Some(path) = explicit {
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                dir.join(path)
            };
            if !path.exists() {
                return Err(ServerError::config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            return Ok(Some(path));
        }

        Ok(CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ServerResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ServerError::config(format!(
                "Invalid log level '{}', must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }

        if self.execution.target_dir.trim().is_empty() {
            return Err(ServerError::config("Execution target dir cannot be empty"));
        }

        if self.execution.timeout_seconds == Some(0) {
            return Err(ServerError::config("Execution timeout cannot be 0"));
        }

        if self.execution.shell.trim().is_empty() {
            return Err(ServerError::config("Execution shell cannot be empty"));
        }

        if self.client.settings_section.is_empty() {
            return Err(ServerError::config("Client settings section cannot be empty"));
        }

        if self.client.request_timeout_seconds == 0 {
            return Err(ServerError::config("Client request timeout cannot be 0"));
        }

        Ok(())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml_string(&self) -> ServerResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ServerError::config(format!("Failed to serialize configuration: {}", e)))
    }
}
