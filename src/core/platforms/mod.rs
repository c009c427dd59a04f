//! Lyrics platforms
//!
//! Each platform adapts one external lyrics source behind [`LyricsPlatform`]:
//! - `azlyrics`: web search + page scraping, gated by Jaro similarity
//! - `genius`: Genius API search + lyrics page scraping (needs a token)
//! - `lyrist`: REST JSON API
//! - `lrclib`: REST JSON API
//! - `musixmatch`: signed API using a secret pulled from the site's bundle
//!
//! Platforms are selected by their configuration key through
//! [`create_platform`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::core::lyrics::LyricsResult;
use crate::error::PlatformError;

pub mod azlyrics;
pub mod genius;
pub mod http;
pub mod lrclib;
pub mod lyrist;
pub mod musixmatch;

#[cfg(test)]
pub mod test_server;

pub use azlyrics::AzLyrics;
pub use genius::Genius;
pub use lrclib::Lrclib;
pub use lyrist::Lyrist;
pub use musixmatch::Musixmatch;

/// A source of lyrics.
///
/// `Ok(None)` means "not found here": no match, a non-200 response, a
/// timeout or an unparseable body. Callers move on to the next platform.
/// `Err` is reserved for broken configuration or scraping patterns.
#[async_trait]
pub trait LyricsPlatform: Send + Sync {
    async fn get_lyrics(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Option<LyricsResult>, PlatformError>;

    fn kind(&self) -> PlatformKind;

    fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformKind {
    #[serde(rename = "a_zlyrics")]
    AzLyrics,
    #[serde(rename = "genius")]
    Genius,
    #[serde(rename = "lyrist")]
    Lyrist,
    #[serde(rename = "lrclib")]
    Lrclib,
    #[serde(rename = "musixmatch")]
    Musixmatch,
}

impl PlatformKind {
    pub const ALL: [PlatformKind; 5] = [
        PlatformKind::AzLyrics,
        PlatformKind::Genius,
        PlatformKind::Lyrist,
        PlatformKind::Lrclib,
        PlatformKind::Musixmatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKind::AzLyrics => "a_zlyrics",
            PlatformKind::Genius => "genius",
            PlatformKind::Lyrist => "lyrist",
            PlatformKind::Lrclib => "lrclib",
            PlatformKind::Musixmatch => "musixmatch",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PlatformKind::AzLyrics => "AZLyrics via web search, with section markers",
            PlatformKind::Genius => "Genius API (requires genius_token)",
            PlatformKind::Lyrist => "Lyrist REST API",
            PlatformKind::Lrclib => "LRCLIB REST API",
            PlatformKind::Musixmatch => "Musixmatch signed web API",
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformKind {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        PlatformKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == key)
            .ok_or_else(|| PlatformError::UnknownPlatform(s.to_string()))
    }
}

/// Build the platform registered under `kind` from configuration.
pub fn create_platform(
    kind: PlatformKind,
    config: &Config,
) -> Result<Arc<dyn LyricsPlatform>, PlatformError> {
    let timeout = Duration::from_secs(config.request_timeout_seconds);

    let platform: Arc<dyn LyricsPlatform> = match kind {
        PlatformKind::AzLyrics => Arc::new(AzLyrics::new(
            &config.search_url,
            &config.azlyrics_url,
            config.match_threshold,
            timeout,
        )?),
        PlatformKind::Genius => Arc::new(Genius::new(
            config.genius_token.as_deref(),
            &config.genius_api_url,
            timeout,
        )?),
        PlatformKind::Lyrist => Arc::new(Lyrist::new(&config.lyrist_base_url, timeout)?),
        PlatformKind::Lrclib => Arc::new(Lrclib::new(&config.lrclib_base_url, timeout)?),
        PlatformKind::Musixmatch => Arc::new(Musixmatch::new(
            &config.musixmatch_api_url,
            &config.musixmatch_site_url,
            timeout,
        )?),
    };

    Ok(platform)
}
