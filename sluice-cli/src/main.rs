//! Sluice CLI
//!
//! Command-line interface for operating the Sluice dispatcher.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "sluice")]
#[command(about = "Sluice workload dispatcher CLI", long_about = None)]
struct Cli {
    /// Dispatcher admin API URL
    #[arg(
        long,
        env = "SLUICE_DISPATCHER_URL",
        default_value = "http://localhost:8080"
    )]
    dispatcher_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        dispatcher_url: cli.dispatcher_url,
    };

    handle_command(cli.command, &config).await
}
