use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

use super::http;
use super::{LyricsPlatform, PlatformKind};
use crate::core::lyrics::LyricsResult;
use crate::core::matching::is_close_match;
use crate::core::sections::split_sections;
use crate::error::PlatformError;

const SITE_FILTER: &str = "site:azlyrics.com";

/// A lyrics page found through web search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub artist_slug: String,
    pub title_slug: String,
}

pub struct AzLyrics {
    client: reqwest::Client,
    search_url: String,
    site_url: String,
    threshold: f64,
}

impl AzLyrics {
    pub fn new(
        search_url: &str,
        site_url: &str,
        threshold: f64,
        timeout: Duration,
    ) -> Result<Self, PlatformError> {
        Ok(Self {
            client: http::build_client(timeout)?,
            search_url: search_url.to_string(),
            site_url: site_url.trim_end_matches('/').to_string(),
            threshold,
        })
    }

    /// Search for the song's lyrics page and return its URL if the first hit
    /// is close enough to the requested artist and title.
    pub async fn find_lyrics_url(&self, title: &str, artist: &str) -> Option<String> {
        let query = search_query(title, artist);
        let request = self.client.get(&self.search_url).query(&[("q", query.as_str())]);
        let page = http::soft(self.name(), http::get_text(request).await)?;

        let candidate = first_candidate(&page)?;
        if !candidate.accepts(title, artist, self.threshold) {
            debug!(
                "Rejected search hit {}/{} for {} - {}",
                candidate.artist_slug, candidate.title_slug, artist, title
            );
            return None;
        }

        Some(candidate.url(&self.site_url))
    }
}

#[async_trait]
impl LyricsPlatform for AzLyrics {
    async fn get_lyrics(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Option<LyricsResult>, PlatformError> {
        let Some(url) = self.find_lyrics_url(title, artist).await else {
            return Ok(None);
        };

        debug!("Fetching lyrics page {}", url);
        let Some(page) = http::soft(self.name(), http::get_text(self.client.get(&url)).await) else {
            return Ok(None);
        };

        Ok(parse_lyrics_page(&page))
    }

    fn kind(&self) -> PlatformKind {
        PlatformKind::AzLyrics
    }
}

impl Candidate {
    pub fn accepts(&self, title: &str, artist: &str, threshold: f64) -> bool {
        is_close_match(artist, &self.artist_slug, threshold)
            && is_close_match(title, &self.title_slug, threshold)
    }

    pub fn url(&self, site_url: &str) -> String {
        format!("{}/lyrics/{}/{}.html", site_url, self.artist_slug, self.title_slug)
    }
}

pub fn search_query(title: &str, artist: &str) -> String {
    [artist.trim(), title.trim(), SITE_FILTER]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

fn candidate_regex() -> &'static Regex {
    static CANDIDATE: OnceLock<Regex> = OnceLock::new();
    CANDIDATE.get_or_init(|| {
        Regex::new(r"(?i)azlyrics\.com(?:/|%2F)lyrics(?:/|%2F)([a-z0-9]+)(?:/|%2F)([a-z0-9]+)\.html")
            .expect("valid azlyrics link regex")
    })
}

/// First lyrics-page link in a search results page, plain or percent-encoded.
pub fn first_candidate(search_page: &str) -> Option<Candidate> {
    let caps = candidate_regex().captures(search_page)?;
    Some(Candidate {
        artist_slug: caps[1].to_lowercase(),
        title_slug: caps[2].to_lowercase(),
    })
}

/// Extract lyrics from a song page: the longest text among class-less divs.
pub fn parse_lyrics_page(html: &str) -> Option<LyricsResult> {
    let document = Html::parse_document(html);
    let bold = Selector::parse("b").expect("valid selector");
    let plain_div = Selector::parse("div:not([class])").expect("valid selector");

    // Song pages always carry bold artist/title headings
    if document.select(&bold).next().is_none() {
        return None;
    }

    let longest = document
        .select(&plain_div)
        .map(|div| div.text().collect::<String>())
        .fold(String::new(), |best, text| {
            if text.chars().count() > best.chars().count() {
                text
            } else {
                best
            }
        });

    let block = longest.trim();
    if block.is_empty() {
        return None;
    }

    Some(split_sections(block))
}
