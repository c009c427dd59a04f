use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::lyrics::LyricsResult;
use crate::core::platforms::musixmatch::TrackRef;
use crate::core::platforms::{create_platform, LyricsPlatform, Musixmatch, PlatformKind};
use crate::error::{AppError, PlatformError, Result};

/// Result of asking one platform as part of a fan-out.
#[derive(Debug)]
pub struct PlatformOutcome {
    pub kind: PlatformKind,
    pub result: std::result::Result<Option<LyricsResult>, PlatformError>,
}

/// Entry point for lyrics lookups.
///
/// Platforms are built once and kept, so per-platform state such as the
/// Musixmatch signing secret survives between lookups.
pub struct LyricsService {
    config: Arc<Config>,
    platforms: Vec<Arc<dyn LyricsPlatform>>,
}

impl LyricsService {
    /// Build every enabled platform. A misconfigured platform fails here.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let platforms = config
            .enabled_platforms
            .iter()
            .map(|kind| create_platform(*kind, &config))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self::with_platforms(config, platforms))
    }

    pub fn with_platforms(config: Arc<Config>, platforms: Vec<Arc<dyn LyricsPlatform>>) -> Self {
        Self { config, platforms }
    }

    pub fn enabled(&self) -> Vec<PlatformKind> {
        self.platforms.iter().map(|p| p.kind()).collect()
    }

    /// The enabled instance of `kind`, or a fresh one if it is not enabled.
    pub fn platform(&self, kind: PlatformKind) -> Result<Arc<dyn LyricsPlatform>> {
        if let Some(platform) = self.platforms.iter().find(|p| p.kind() == kind) {
            return Ok(platform.clone());
        }
        Ok(create_platform(kind, &self.config)?)
    }

    /// Ask a single platform.
    pub async fn fetch(
        &self,
        kind: PlatformKind,
        title: &str,
        artist: &str,
    ) -> Result<Option<LyricsResult>> {
        let platform = self.platform(kind)?;
        info!("Searching {} for: {} - {}", kind, artist, title);

        let lyrics = platform.get_lyrics(title, artist).await?;
        Ok(lyrics.filter(|l| !l.is_blank()))
    }

    /// Look a recording up on Musixmatch by its ISRC.
    pub async fn fetch_by_isrc(&self, isrc: &str) -> Result<Option<LyricsResult>> {
        let isrc = isrc.trim().to_uppercase();
        if isrc.is_empty() || !isrc.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::Validation(format!("Invalid ISRC '{}'", isrc)));
        }

        let musixmatch = Musixmatch::new(
            &self.config.musixmatch_api_url,
            &self.config.musixmatch_site_url,
            Duration::from_secs(self.config.request_timeout_seconds),
        )?;
        info!("Searching musixmatch for ISRC {}", isrc);

        let lyrics = musixmatch.lyrics_for(&TrackRef::Isrc(isrc)).await?;
        Ok(lyrics.filter(|l| !l.is_blank()))
    }

    /// Try enabled platforms in order and return the first hit.
    ///
    /// A platform failing hard is logged and skipped. If no platform finds
    /// anything, the first such failure is returned instead of `None`.
    pub async fn fetch_first(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Option<(PlatformKind, LyricsResult)>> {
        let mut first_error: Option<PlatformError> = None;

        for platform in &self.platforms {
            let kind = platform.kind();
            debug!("Trying {} for: {} - {}", kind, artist, title);

            match platform.get_lyrics(title, artist).await {
                Ok(Some(lyrics)) if !lyrics.is_blank() => {
                    info!("Found lyrics on {} ({} sections)", kind, lyrics.len());
                    return Ok(Some((kind, lyrics)));
                }
                Ok(_) => debug!("No lyrics on {}", kind),
                Err(e) => {
                    warn!("{} failed: {}", kind, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(None),
        }
    }

    /// Ask every enabled platform concurrently.
    pub async fn fetch_all(&self, title: &str, artist: &str) -> Vec<PlatformOutcome> {
        let lookups = self.platforms.iter().map(|platform| async move {
            let result = platform
                .get_lyrics(title, artist)
                .await
                .map(|lyrics| lyrics.filter(|l| !l.is_blank()));
            PlatformOutcome {
                kind: platform.kind(),
                result,
            }
        });

        join_all(lookups).await
    }
}
