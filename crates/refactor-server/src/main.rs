//! refactor-ls main binary

use anyhow::Context;
use clap::{Parser, Subcommand};
use refactor_config::AppConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "refactor-ls")]
#[command(about = "Language server for Rust refactorings", version)]
struct Cli {
    /// Configuration file (defaults to refactor-ls.toml in the working directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve LSP over stdio (default)
    Serve,
    /// Print the effective configuration as TOML
    PrintConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::PrintConfig => {
            print!("{}", config.to_toml_string()?);
        }
        Commands::Serve => {
            refactor_config::logging::initialize(&config);
            tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting refactor-ls");
            refactor_server::serve_stdio(&config).await?;
            tracing::info!("refactor-ls stopped");
        }
    }

    Ok(())
}
