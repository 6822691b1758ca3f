//! Matchcaller CLI - Command-line interface
//!
//! Replays captured tournament snapshots for exercising display clients.

mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "matchcaller")]
#[command(about = "A tournament bracket replay tool")]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    commands::handle_command(cli.command).await
}
