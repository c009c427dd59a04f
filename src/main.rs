use clap::{Parser, Subcommand};
use std::sync::Arc;

mod cli;
mod config;
mod core;
mod error;
mod signal_handler;
mod utils;

use cli::{fetch, platforms};
use config::Config;
use crate::core::services::LyricsService;
use error::Result;

#[derive(Parser)]
#[command(name = "lyricfetch")]
#[command(about = "Fetch song lyrics from several online lyrics platforms")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file path (optional)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch lyrics for a song
    Fetch(fetch::FetchArgs),

    /// List lyrics platforms
    Platforms,

    /// Show configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    utils::logging::init_logging(cli.verbose)?;

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Fetch(args) => {
            let service = LyricsService::new(Arc::new(config))?;
            signal_handler::until_interrupted(fetch::execute(args, &service)).await
        }
        Commands::Platforms => {
            platforms::execute(&config);
            Ok(())
        }
        Commands::Config(args) => cli::config::execute(args, &config),
    }
}
