use clap::{Args, Subcommand};

use crate::config::env::{EnvParser, EnvVars};
use crate::config::Config as AppConfig;
use crate::error::Result;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// List all available configuration keys
    Keys,
}

pub fn execute(args: ConfigArgs, config: &AppConfig) -> Result<()> {
    match args.command {
        ConfigCommands::Show => {
            println!("Current configuration:");
            let platforms: Vec<&str> = config.enabled_platforms.iter().map(|k| k.as_str()).collect();
            println!("  enabled_platforms: {}", platforms.join(", "));
            println!(
                "  genius_token: {}",
                if config.genius_token.is_some() { "(set)" } else { "(not set)" }
            );
            for (name, url) in config.endpoints() {
                println!("  {}: {}", name, url);
            }
            println!("  match_threshold: {}", config.match_threshold);
            println!("  request_timeout_seconds: {}", config.request_timeout_seconds);

            let env_vars = EnvParser::get_all_lyricfetch_vars();
            if !env_vars.is_empty() {
                println!("\nEnvironment overrides:");
                for (key, value) in env_vars {
                    println!("  {} = {}", key, value);
                }
            }
        }

        ConfigCommands::Path => {
            let config_path = AppConfig::config_path()?;
            println!("{}", config_path.display());
        }

        ConfigCommands::Keys => {
            println!("Configuration keys (config file / environment):");
            for (key, var, help) in CONFIG_KEYS {
                println!("  {:<24} {:<38} {}", key, var, help);
            }
        }
    }

    Ok(())
}

const CONFIG_KEYS: [(&str, &str, &str); 11] = [
    ("enabled_platforms", EnvVars::ENABLED_PLATFORMS, "Comma-separated platform keys, in preference order"),
    ("genius_token", EnvVars::GENIUS_TOKEN, "Genius API access token"),
    ("genius_api_url", EnvVars::GENIUS_API_URL, "Genius API endpoint"),
    ("lyrist_base_url", EnvVars::LYRIST_BASE_URL, "Lyrist API base URL"),
    ("lrclib_base_url", EnvVars::LRCLIB_BASE_URL, "LRCLIB API base URL"),
    ("musixmatch_api_url", EnvVars::MUSIXMATCH_API_URL, "Musixmatch web API base URL"),
    ("musixmatch_site_url", EnvVars::MUSIXMATCH_SITE_URL, "Musixmatch site (signing secret source)"),
    ("search_url", EnvVars::SEARCH_URL, "HTML web search endpoint for AZLyrics"),
    ("azlyrics_url", EnvVars::AZLYRICS_URL, "AZLyrics site URL"),
    ("match_threshold", EnvVars::MATCH_THRESHOLD, "Minimum Jaro similarity, 0.0 to 1.0"),
    ("request_timeout_seconds", EnvVars::REQUEST_TIMEOUT_SECONDS, "Per-request timeout, 1 to 300"),
];
