use async_trait::async_trait;
use scraper::{ElementRef, Html, Node, Selector};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::http;
use super::{LyricsPlatform, PlatformKind};
use crate::core::lyrics::LyricsResult;
use crate::core::matching::slugify;
use crate::error::PlatformError;

#[derive(Deserialize, Debug)]
struct SearchEnvelope {
    response: SearchResponse,
}

#[derive(Deserialize, Debug)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Deserialize, Debug)]
struct SearchHit {
    #[serde(rename = "type")]
    kind: String,
    result: SongHit,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SongHit {
    pub title: String,
    pub url: String,
    pub primary_artist: Option<ArtistHit>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ArtistHit {
    pub name: String,
}

pub struct Genius {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl Genius {
    pub fn new(token: Option<&str>, api_url: &str, timeout: Duration) -> Result<Self, PlatformError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(PlatformError::MissingCredentials {
                platform: "genius",
                field: "genius_token",
            })?;

        Ok(Self {
            client: http::build_client(timeout)?,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    pub async fn search_song(&self, title: &str, artist: &str) -> Option<SongHit> {
        let query = format!("{} {}", title, artist);
        let request = self
            .client
            .get(format!("{}/search", self.api_url))
            .bearer_auth(&self.token)
            .query(&[("q", query.trim())]);

        let envelope: SearchEnvelope = http::soft(self.name(), http::get_json(request).await)?;
        pick_song(envelope.response.hits, title)
    }
}

#[async_trait]
impl LyricsPlatform for Genius {
    async fn get_lyrics(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Option<LyricsResult>, PlatformError> {
        let Some(song) = self.search_song(title, artist).await else {
            return Ok(None);
        };

        debug!(
            "Genius hit: {} by {}",
            song.title,
            song.primary_artist.as_ref().map_or("unknown", |a| a.name.as_str())
        );

        let Some(page) = http::soft(self.name(), http::get_text(self.client.get(&song.url)).await) else {
            return Ok(None);
        };

        Ok(extract_lyrics(&page).map(LyricsResult::single))
    }

    fn kind(&self) -> PlatformKind {
        PlatformKind::Genius
    }
}

/// Prefer the song whose title matches, else the first song hit.
fn pick_song(hits: Vec<SearchHit>, title: &str) -> Option<SongHit> {
    let wanted = slugify(title);
    let songs: Vec<SongHit> = hits
        .into_iter()
        .filter(|hit| hit.kind == "song")
        .map(|hit| hit.result)
        .collect();

    let idx = songs
        .iter()
        .position(|song| slugify(&song.title) == wanted)
        .unwrap_or(0);
    songs.into_iter().nth(idx)
}

/// Text of all lyrics containers on a song page, `<br>` as line breaks.
pub fn extract_lyrics(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let container = Selector::parse(r#"div[data-lyrics-container="true"]"#).expect("valid selector");

    let parts: Vec<String> = document
        .select(&container)
        .map(|element| {
            let mut text = String::new();
            collect_text(element, &mut text);
            text
        })
        .collect();

    let lyrics = parts.join("\n");
    let lyrics = lyrics.trim();
    if lyrics.is_empty() {
        None
    } else {
        Some(lyrics.to_string())
    }
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name() == "br" => out.push('\n'),
            Node::Element(el) if el.attr("data-exclude-from-selection").is_some() => {}
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}
