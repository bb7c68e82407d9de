mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use converger_core::ConvergeConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gcal-converger")]
#[command(about = "Make a Google Calendar match a list of events read from JSON")]
struct Cli {
    /// Configuration file (defaults to ~/.config/gcal-converger/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authorize access to Google Calendar and store the OAuth token
    Auth,
    /// Converge the calendar onto the events read from stdin
    Run {
        /// Only events whose title starts with this prefix are managed
        #[arg(long)]
        title_prefix_filter: String,

        /// Read events from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the planned changes without writing anything
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ConvergeConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Auth => commands::auth::run(&config).await,
        Commands::Run {
            title_prefix_filter,
            input,
            dry_run,
        } => commands::run::run(&config, &title_prefix_filter, input.as_deref(), dry_run).await,
    }
}
