use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::http;
use super::{LyricsPlatform, PlatformKind};
use crate::core::lyrics::LyricsResult;
use crate::error::PlatformError;

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: Option<i64>,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub plain_lyrics: Option<String>,
    #[serde(default)]
    pub instrumental: bool,
}

pub struct Lrclib {
    client: reqwest::Client,
    base_url: String,
}

impl Lrclib {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PlatformError> {
        Ok(Self {
            client: http::build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn search(&self, title: &str, artist: &str) -> Option<Vec<SearchResult>> {
        let url = format!("{}/search", self.base_url);
        let params = search_params(title, artist);
        debug!("Searching LRCLIB with params: {:?}", params);

        http::soft(self.name(), http::get_json(self.client.get(&url).query(&params)).await)
    }
}

/// Free-text query on the title, narrowed by artist when one is given.
fn search_params<'a>(title: &'a str, artist: &'a str) -> Vec<(&'static str, &'a str)> {
    match (title.is_empty(), artist.is_empty()) {
        (false, false) => vec![("q", title), ("artist_name", artist)],
        (true, false) => vec![("q", artist)],
        _ => vec![("q", title)],
    }
}

#[async_trait]
impl LyricsPlatform for Lrclib {
    async fn get_lyrics(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Option<LyricsResult>, PlatformError> {
        let Some(hit) = self.search(title, artist).await.unwrap_or_default().into_iter().next() else {
            return Ok(None);
        };

        debug!(
            "LRCLIB hit {:?}: {} - {}",
            hit.id,
            hit.artist_name.as_deref().unwrap_or("unknown"),
            hit.track_name.as_deref().unwrap_or("unknown")
        );
        if hit.instrumental {
            debug!("LRCLIB marks the track as instrumental");
            return Ok(None);
        }

        Ok(hit
            .plain_lyrics
            .filter(|lyrics| !lyrics.trim().is_empty())
            .map(LyricsResult::single))
    }

    fn kind(&self) -> PlatformKind {
        PlatformKind::Lrclib
    }
}
