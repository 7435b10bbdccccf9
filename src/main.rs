//! Switchboard - Provider Channel Adapter Host
//!
//! CLI entry point for the Switchboard server.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use server::config::LogFormat;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod cli;
mod server;

const DEFAULT_LOG_FILTER: &str = "switchboard=info,switchboard_channels=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();
    let config = server::load_config()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);
    // stderr keeps stdout clean for `send` output
    match config.logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    info!("Starting Switchboard v{}", env!("CARGO_PKG_VERSION"));

    cli::run(cli, config).await
}
