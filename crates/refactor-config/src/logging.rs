//! Tracing setup for the language server
//!
//! stdout belongs to the JSON-RPC stream, so every log line goes to stderr,
//! where editors usually collect it into the server's output channel.

use crate::{AppConfig, LogFormat};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the global subscriber.
///
/// `RUST_LOG` directives are added on top of `logging.level`; `LOG_FORMAT`
/// (`json` or `pretty`) replaces `logging.format` for one run:
///
/// ```bash
/// RUST_LOG=refactor_services=trace refactor-ls serve
/// LOG_FORMAT=json refactor-ls --config ./refactor-ls.toml serve
/// ```
pub fn initialize(config: &AppConfig) {
    let format = format_override(std::env::var("LOG_FORMAT").ok().as_deref())
        .unwrap_or_else(|| config.logging.format.clone());

    let output = match format {
        LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(level_filter(&config.logging.level))
        .with(output)
        .init();
}

/// `RUST_LOG` plus the configured level; an unparsable level means `info`
fn level_filter(level: &str) -> EnvFilter {
    let level = level.parse().unwrap_or(tracing::Level::INFO);
    EnvFilter::from_default_env().add_directive(level.into())
}

fn format_override(value: Option<&str>) -> Option<LogFormat> {
    match value?.to_lowercase().as_str() {
        "json" => Some(LogFormat::Json),
        "pretty" | "human" => Some(LogFormat::Pretty),
        _ => None,
    }
}

/// Span wrapping the handling of one client request
///
/// ```rust
/// use refactor_config::logging::request_span;
///
/// let span = request_span("7", "workspace/executeCommand");
/// let _enter = span.enter();
/// tracing::debug!("dispatching");
/// ```
pub fn request_span(request_id: &str, method: &str) -> tracing::Span {
    tracing::info_span!("lsp_request", request_id = %request_id, method = %method)
}
