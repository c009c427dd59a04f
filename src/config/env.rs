use std::env;
use crate::error::{Result, AppError};

/// Environment variable configuration constants
pub struct EnvVars;

impl EnvVars {
    pub const ENABLED_PLATFORMS: &'static str = "LYRICFETCH_ENABLED_PLATFORMS";
    pub const GENIUS_TOKEN: &'static str = "LYRICFETCH_GENIUS_TOKEN";
    pub const GENIUS_API_URL: &'static str = "LYRICFETCH_GENIUS_API_URL";
    pub const LYRIST_BASE_URL: &'static str = "LYRICFETCH_LYRIST_BASE_URL";
    pub const LRCLIB_BASE_URL: &'static str = "LYRICFETCH_LRCLIB_BASE_URL";
    pub const MUSIXMATCH_API_URL: &'static str = "LYRICFETCH_MUSIXMATCH_API_URL";
    pub const MUSIXMATCH_SITE_URL: &'static str = "LYRICFETCH_MUSIXMATCH_SITE_URL";
    pub const SEARCH_URL: &'static str = "LYRICFETCH_SEARCH_URL";
    pub const AZLYRICS_URL: &'static str = "LYRICFETCH_AZLYRICS_URL";
    pub const MATCH_THRESHOLD: &'static str = "LYRICFETCH_MATCH_THRESHOLD";
    pub const REQUEST_TIMEOUT_SECONDS: &'static str = "LYRICFETCH_REQUEST_TIMEOUT_SECONDS";
}

/// Environment variable parsing utilities with validation
pub struct EnvParser;

impl EnvParser {
    /// Parse environment variable as string with validation
    pub fn parse_string(var_name: &str, validator: Option<fn(&str) -> Result<()>>) -> Result<Option<String>> {
        match env::var(var_name) {
            Ok(value) => {
                let trimmed = value.trim().to_string();
                if trimmed.is_empty() {
                    return Ok(None);
                }

                if let Some(validate_fn) = validator {
                    validate_fn(&trimmed)?;
                }

                Ok(Some(trimmed))
            }
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => {
                Err(AppError::Validation(format!(
                    "Environment variable {} contains invalid UTF-8",
                    var_name
                )))
            }
        }
    }

    /// Parse environment variable as u64 with range validation
    pub fn parse_u64(var_name: &str, min: u64, max: u64) -> Result<Option<u64>> {
        if let Some(value_str) = Self::parse_string(var_name, None)? {
            let value = value_str.parse::<u64>().map_err(|_| {
                AppError::Validation(format!(
                    "Invalid number in {}: '{}'. Must be a positive integer",
                    var_name, value_str
                ))
            })?;

            if value < min || value > max {
                return Err(AppError::Validation(format!(
                    "Value in {} must be between {} and {}, got {}",
                    var_name, min, max, value
                )));
            }

            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    /// Parse environment variable as f64 with range validation
    pub fn parse_f64(var_name: &str, min: f64, max: f64) -> Result<Option<f64>> {
        if let Some(value_str) = Self::parse_string(var_name, None)? {
            let value = value_str.parse::<f64>().map_err(|_| {
                AppError::Validation(format!(
                    "Invalid number in {}: '{}'",
                    var_name, value_str
                ))
            })?;

            if !(min..=max).contains(&value) {
                return Err(AppError::Validation(format!(
                    "Value in {} must be between {} and {}, got {}",
                    var_name, min, max, value
                )));
            }

            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    /// Parse a comma-separated list, skipping blank items
    pub fn parse_list(var_name: &str) -> Result<Option<Vec<String>>> {
        Ok(Self::parse_string(var_name, None)?.map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect()
        }))
    }

    /// All `LYRICFETCH_*` variables currently set, secrets masked
    pub fn get_all_lyricfetch_vars() -> Vec<(String, String)> {
        let mut vars: Vec<(String, String)> = env::vars()
            .filter(|(key, _)| key.starts_with("LYRICFETCH_"))
            .map(|(key, value)| {
                if key == EnvVars::GENIUS_TOKEN {
                    (key, "***".to_string())
                } else {
                    (key, value)
                }
            })
            .collect();
        vars.sort();
        vars
    }
}
