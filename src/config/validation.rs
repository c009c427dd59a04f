use url::Url;
use crate::core::platforms::PlatformKind;
use crate::error::{Result, AppError, ConfigError};

/// Centralized configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a URL string
    pub fn validate_url(url: &str, field_name: &str) -> Result<()> {
        Url::parse(url).map_err(|e| {
            AppError::Validation(format!("Invalid {} URL '{}': {}", field_name, url, e))
        })?;
        Ok(())
    }

    /// Validate numeric range
    pub fn validate_range<T>(value: T, min: T, max: T, field_name: &str) -> Result<()>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if !(min..=max).contains(&value) {
            return Err(AppError::Validation(format!(
                "{} must be between {} and {}, got {}",
                field_name, min, max, value
            )));
        }
        Ok(())
    }

    /// Parse platform keys, rejecting unknown ones and duplicates
    pub fn parse_platforms<S: AsRef<str>>(keys: &[S]) -> Result<Vec<PlatformKind>> {
        let mut platforms = Vec::with_capacity(keys.len());
        for key in keys {
            let kind: PlatformKind = key.as_ref().parse().map_err(|_| {
                ConfigError::InvalidValue {
                    field: "enabled_platforms".to_string(),
                    value: key.as_ref().to_string(),
                }
            })?;
            if platforms.contains(&kind) {
                return Err(AppError::Validation(format!(
                    "Platform '{}' is listed more than once",
                    kind
                )));
            }
            platforms.push(kind);
        }
        Ok(platforms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(ConfigValidator::validate_url("https://lrclib.net/api", "LRCLIB").is_ok());
        assert!(ConfigValidator::validate_url("not-a-url", "LRCLIB").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(ConfigValidator::validate_range(5u64, 1u64, 10u64, "test").is_ok());
        assert!(ConfigValidator::validate_range(15u64, 1u64, 10u64, "test").is_err());
        assert!(ConfigValidator::validate_range(0.6f64, 0.0f64, 1.0f64, "test").is_ok());
        assert!(ConfigValidator::validate_range(f64::NAN, 0.0f64, 1.0f64, "test").is_err());
    }

    #[test]
    fn test_parse_platforms() {
        let platforms = ConfigValidator::parse_platforms(&["lrclib", "a_zlyrics"]).unwrap();
        assert_eq!(platforms, vec![PlatformKind::Lrclib, PlatformKind::AzLyrics]);

        let err = ConfigValidator::parse_platforms(&["lrclib", "napster"]).unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::InvalidValue { ref value, .. }) if value == "napster"));

        assert!(ConfigValidator::parse_platforms(&["lrclib", "LRCLIB"]).is_err());
    }
}
