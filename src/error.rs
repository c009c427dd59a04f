//! Error handling for the lyricfetch application
//!
//! Platforms fail soft: a missing song, a non-200 response or a network blip
//! is reported as an absent result, never as an error. The types here cover
//! the failures that must reach the operator: broken credentials, broken
//! scraping patterns and invalid configuration.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Fatal failures of a single lyrics platform.
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Missing credentials for {platform}: set {field}")]
    MissingCredentials { platform: &'static str, field: &'static str },

    #[error("Unknown lyrics platform: {0}")]
    UnknownPlatform(String),

    #[error("Invalid endpoint for {platform}: {url}")]
    InvalidEndpoint { platform: &'static str, url: String },

    #[error("_app URL not found in the HTML content")]
    AppBundleNotFound,

    #[error("Encoded secret not found in the JavaScript code")]
    SecretNotFound,

    #[error("Failed to decode signing secret: {reason}")]
    SecretDecode { reason: String },

    #[error("Failed to download signing secret: {0}")]
    SecretFetch(#[source] reqwest::Error),

    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("API response invalid: {reason}")]
    InvalidResponse { reason: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid config format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

pub type Result<T> = std::result::Result<T, AppError>;

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.into())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(ConfigError::InvalidFormat(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_error_converts_to_app_error() {
        let err: AppError = PlatformError::SecretNotFound.into();
        assert!(matches!(err, AppError::Platform(PlatformError::SecretNotFound)));
        assert!(err.to_string().contains("Encoded secret not found"));
    }

    #[test]
    fn test_missing_credentials_message_names_field() {
        let err = PlatformError::MissingCredentials {
            platform: "genius",
            field: "genius_token",
        };
        assert_eq!(err.to_string(), "Missing credentials for genius: set genius_token");
    }
}
