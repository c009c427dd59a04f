use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use directories::ProjectDirs;
use tracing::debug;

use crate::core::platforms::PlatformKind;
use crate::error::{AppError, ConfigError, Result};

pub mod env;
pub mod validation;

use env::{EnvParser, EnvVars};
use validation::ConfigValidator;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Platforms tried by `fetch`, in order of preference
    pub enabled_platforms: Vec<PlatformKind>,

    /// Genius API access token (required by the genius platform)
    pub genius_token: Option<String>,

    /// Genius API endpoint
    pub genius_api_url: String,

    /// Lyrist API base URL
    pub lyrist_base_url: String,

    /// LRCLIB API base URL
    pub lrclib_base_url: String,

    /// Musixmatch web API base URL
    pub musixmatch_api_url: String,

    /// Musixmatch site, used to locate the request signing secret
    pub musixmatch_site_url: String,

    /// HTML web search endpoint used to find AZLyrics pages
    pub search_url: String,

    /// AZLyrics site URL
    pub azlyrics_url: String,

    /// Minimum Jaro similarity for accepting a search hit
    pub match_threshold: f64,

    /// Per-request timeout (seconds)
    pub request_timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled_platforms: vec![
                PlatformKind::Lrclib,
                PlatformKind::Musixmatch,
                PlatformKind::Lyrist,
                PlatformKind::AzLyrics,
            ],
            genius_token: None,
            genius_api_url: "https://api.genius.com".to_string(),
            lyrist_base_url: "https://lyrist.vercel.app/api/".to_string(),
            lrclib_base_url: "https://lrclib.net/api".to_string(),
            musixmatch_api_url: "https://www.musixmatch.com/ws/1.1".to_string(),
            musixmatch_site_url: "https://www.musixmatch.com".to_string(),
            search_url: "https://duckduckgo.com/html/".to_string(),
            azlyrics_url: "https://www.azlyrics.com".to_string(),
            match_threshold: 0.6,
            request_timeout_seconds: 10,
        }
    }
}

fn validate_endpoint(url: &str) -> Result<()> {
    ConfigValidator::validate_url(url, "endpoint")
}

impl Config {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Try to load .env file if it exists
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        let config_file = match config_path {
            Some(path) => {
                let path = PathBuf::from(path);
                if !path.exists() {
                    return Err(ConfigError::FileNotFound { path }.into());
                }
                path
            }
            None => Self::default_config_path()?,
        };

        if config_file.exists() {
            debug!("Loading configuration from {}", config_file.display());
            let content = fs::read_to_string(&config_file)?;
            config = toml::from_str(&content)?;
        } else {
            if let Some(parent) = config_file.parent() {
                fs::create_dir_all(parent)?;
            }
            config.save(&config_file)?;
        }

        // Environment variables have the highest priority
        config.load_from_env()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration overrides from environment variables
    pub fn load_from_env(&mut self) -> Result<()> {
        if let Some(keys) = EnvParser::parse_list(EnvVars::ENABLED_PLATFORMS)? {
            self.enabled_platforms = ConfigValidator::parse_platforms(&keys)?;
        }

        if let Some(token) = EnvParser::parse_string(EnvVars::GENIUS_TOKEN, None)? {
            self.genius_token = Some(token);
        }

        let endpoints = [
            (EnvVars::GENIUS_API_URL, &mut self.genius_api_url),
            (EnvVars::LYRIST_BASE_URL, &mut self.lyrist_base_url),
            (EnvVars::LRCLIB_BASE_URL, &mut self.lrclib_base_url),
            (EnvVars::MUSIXMATCH_API_URL, &mut self.musixmatch_api_url),
            (EnvVars::MUSIXMATCH_SITE_URL, &mut self.musixmatch_site_url),
            (EnvVars::SEARCH_URL, &mut self.search_url),
            (EnvVars::AZLYRICS_URL, &mut self.azlyrics_url),
        ];
        for (var_name, field) in endpoints {
            if let Some(url) = EnvParser::parse_string(var_name, Some(validate_endpoint))? {
                *field = url;
            }
        }

        if let Some(threshold) = EnvParser::parse_f64(EnvVars::MATCH_THRESHOLD, 0.0, 1.0)? {
            self.match_threshold = threshold;
        }

        if let Some(timeout) = EnvParser::parse_u64(EnvVars::REQUEST_TIMEOUT_SECONDS, 1, 300)? {
            self.request_timeout_seconds = timeout;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in self.endpoints() {
            ConfigValidator::validate_url(url, name)?;
        }
        ConfigValidator::validate_range(self.match_threshold, 0.0, 1.0, "match_threshold")?;
        ConfigValidator::validate_range(self.request_timeout_seconds, 1, 300, "request_timeout_seconds")?;

        let keys: Vec<&str> = self.enabled_platforms.iter().map(PlatformKind::as_str).collect();
        ConfigValidator::parse_platforms(&keys)?;
        Ok(())
    }

    pub fn endpoints(&self) -> [(&'static str, &str); 7] {
        [
            ("genius_api_url", self.genius_api_url.as_str()),
            ("lyrist_base_url", self.lyrist_base_url.as_str()),
            ("lrclib_base_url", self.lrclib_base_url.as_str()),
            ("musixmatch_api_url", self.musixmatch_api_url.as_str()),
            ("musixmatch_site_url", self.musixmatch_site_url.as_str()),
            ("search_url", self.search_url.as_str()),
            ("azlyrics_url", self.azlyrics_url.as_str()),
        ]
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| AppError::Internal(e.into()))?;
        fs::write(path, content)?;
        Ok(())
    }

    fn default_config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("net", "lyricfetch", "lyricfetch")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;

        Ok(project_dirs.config_dir().join("config.toml"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Self::default_config_path()
    }
}
