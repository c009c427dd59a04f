use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::http;
use super::{LyricsPlatform, PlatformKind};
use crate::core::lyrics::LyricsResult;
use crate::error::PlatformError;

#[derive(Deserialize, Debug)]
struct LyristResponse {
    lyrics: Option<String>,
}

pub struct Lyrist {
    client: reqwest::Client,
    base_url: Url,
}

impl Lyrist {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PlatformError> {
        let invalid = || PlatformError::InvalidEndpoint {
            platform: "lyrist",
            url: base_url.to_string(),
        };
        let base_url = Url::parse(base_url).map_err(|_| invalid())?;
        if base_url.cannot_be_a_base() {
            return Err(invalid());
        }

        Ok(Self {
            client: http::build_client(timeout)?,
            base_url,
        })
    }

    /// `<base>/<title>/<artist>` with both parts escaped as path segments.
    pub fn request_url(&self, title: &str, artist: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(title).push(artist);
        }
        url
    }
}

#[async_trait]
impl LyricsPlatform for Lyrist {
    async fn get_lyrics(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Option<LyricsResult>, PlatformError> {
        let request = self.client.get(self.request_url(title, artist));
        let response: Option<LyristResponse> = http::soft(self.name(), http::get_json(request).await);

        Ok(response
            .and_then(|r| r.lyrics)
            .filter(|lyrics| !lyrics.trim().is_empty())
            .map(LyricsResult::single))
    }

    fn kind(&self) -> PlatformKind {
        PlatformKind::Lyrist
    }
}
