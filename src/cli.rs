//! Command-Line Interface
//!
//! One binary, no subcommands: parse flags, load config, run the bot.

use crate::channels;
use crate::config::Config;
use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "crabrelay",
    version,
    about = "Discord mention relay for OpenAI-compatible chat completion APIs"
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// Load configuration and run the Discord bot until it stops.
pub async fn run() -> Result<()> {
    let config = Config::from_env()?;

    tracing::info!(
        "Starting crabrelay v{}: model={}, max_tokens={}, max_history={}, completion_url={}",
        crate::VERSION,
        config.model,
        config.max_tokens,
        config.max_history_length,
        config.completion_url(),
    );

    channels::discord::run(config).await
}
