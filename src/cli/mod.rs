//! CLI module for Switchboard
//!
//! Provides commands:
//! - `serve`: Start the receive server (default)
//! - `channels`: List configured channel instances
//! - `send`: Send one message through a configured channel

use crate::server::config::AppConfig;
use clap::{Parser, Subcommand};
use uuid::Uuid;

pub mod channels;
pub mod send;

/// Switchboard channel adapter CLI
#[derive(Parser, Debug)]
#[command(name = "switchboard")]
#[command(about = "Provider channel adapters for message routing")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server (default)
    Serve,
    /// List configured channels
    Channels,
    /// Send a message through a configured channel
    Send {
        /// Channel uuid
        #[arg(long)]
        channel: Uuid,
        /// Recipient address (phone number)
        #[arg(long)]
        to: String,
        /// Message text
        #[arg(long, default_value = "")]
        text: String,
        /// Attachment as `<mime type>:<url>`
        #[arg(long)]
        attachment: Option<String>,
    },
}

/// Run the CLI command
pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Channels) => {
            channels::run(&config);
            Ok(())
        }
        Some(Commands::Send {
            channel,
            to,
            text,
            attachment,
        }) => send::run(&config, channel, &to, text, attachment.as_deref()).await,
        Some(Commands::Serve) | None => crate::server::run(config).await,
    }
}
