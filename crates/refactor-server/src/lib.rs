//! Language server exposing Rust refactorings to the editor

pub mod backend;
pub mod client;
pub mod connection;

pub use backend::{serve, Backend};
pub use client::EditorClient;
pub use connection::Connection;

use refactor_config::AppConfig;
use refactor_foundation::ServerResult;

/// Serve on stdin/stdout
pub async fn serve_stdio(config: &AppConfig) -> ServerResult<()> {
    serve(tokio::io::stdin(), tokio::io::stdout(), config).await
}
