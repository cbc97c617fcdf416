//! `catalog-console`: command-line admin client for the project catalog.

mod commands;
mod config;
mod render;
mod session_store;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::Cli;
use config::ConsoleConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    // Logs go to stderr so command output stays pipeable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "catalog_console=info,catalog_engine=info,catalog_gateway=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // --- Configuration ---
    let config = ConsoleConfig::from_env()?;
    tracing::debug!(api_base = %config.api_base, endpoint = %config.catalog_endpoint, "Loaded console configuration");

    commands::run(cli.command, config).await
}
