//! Musixmatch web API client.
//!
//! The web API wants every request signed with an HMAC keyed by a secret
//! that ships, reversed and base64-encoded, inside the site's `_app` bundle.
//! The secret is fetched on first use and kept for the life of the client.

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use data_encoding::BASE64;
use regex::Regex;
use reqwest::header::{COOKIE, USER_AGENT};
use ring::hmac;
use serde_json::Value;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use url::form_urlencoded;

use super::http;
use super::{LyricsPlatform, PlatformKind};
use crate::core::lyrics::LyricsResult;
use crate::error::PlatformError;

const APP_ID: &str = "web-desktop-app-v1.0";
const SECRET_TIMEOUT: Duration = Duration::from_secs(5);

/// Track identifier accepted by `track.lyrics.get`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackRef {
    Id(u64),
    Isrc(String),
}

impl TrackRef {
    fn query_param(&self) -> String {
        match self {
            TrackRef::Id(id) => format!("track_id={}", id),
            TrackRef::Isrc(isrc) => format!("track_isrc={}", encode(isrc)),
        }
    }
}

pub struct Musixmatch {
    client: reqwest::Client,
    api_url: String,
    site_url: String,
    secret: OnceCell<String>,
}

impl Musixmatch {
    pub fn new(api_url: &str, site_url: &str, timeout: Duration) -> Result<Self, PlatformError> {
        Ok(Self {
            client: http::build_client(timeout)?,
            api_url: api_url.trim_end_matches('/').to_string(),
            site_url: site_url.trim_end_matches('/').to_string(),
            secret: OnceCell::new(),
        })
    }

    pub async fn search_tracks(&self, query: &str, page: u32) -> Result<Option<Value>, PlatformError> {
        let path = format!(
            "track.search?app_id={}&format=json&q={}&f_has_lyrics=true&page_size=5&page={}",
            APP_ID,
            encode(query),
            page
        );
        self.make_request(&path).await
    }

    pub async fn get_track_lyrics(&self, track: &TrackRef) -> Result<Option<Value>, PlatformError> {
        let path = format!(
            "track.lyrics.get?app_id={}&format=json&{}",
            APP_ID,
            track.query_param()
        );
        self.make_request(&path).await
    }

    /// Sign and send an API call. Only secret acquisition can fail hard.
    async fn make_request(&self, path: &str) -> Result<Option<Value>, PlatformError> {
        let url = format!(
            "{}/{}",
            self.api_url,
            path.replace("%20", "+").replace(' ', "+")
        );
        let secret = self.secret().await?;
        let signed_url = format!("{}{}", url, signature_params(secret, &url, Local::now().date_naive()));

        Ok(http::soft(self.name(), http::get_json(self.client.get(&signed_url)).await))
    }

    /// Lyrics for a known track, skipping the search step.
    pub async fn lyrics_for(&self, track: &TrackRef) -> Result<Option<LyricsResult>, PlatformError> {
        let Some(lyrics) = self.get_track_lyrics(track).await? else {
            return Ok(None);
        };

        Ok(lyrics["message"]["body"]["lyrics"]["lyrics_body"]
            .as_str()
            .filter(|body| !body.trim().is_empty())
            .map(LyricsResult::single))
    }

    async fn secret(&self) -> Result<&str, PlatformError> {
        self.secret
            .get_or_try_init(|| self.fetch_secret())
            .await
            .map(String::as_str)
    }

    async fn fetch_secret(&self) -> Result<String, PlatformError> {
        let search_page = self
            .client
            .get(format!("{}/search", self.site_url))
            .header(USER_AGENT, http::random_user_agent())
            .header(COOKIE, "mxm_bab=AB")
            .send()
            .await
            .map_err(PlatformError::SecretFetch)?
            .text()
            .await
            .map_err(PlatformError::SecretFetch)?;

        let app_url = find_app_url(&search_page, &self.site_url).ok_or(PlatformError::AppBundleNotFound)?;
        debug!("Musixmatch app bundle: {}", app_url);

        let script = self
            .client
            .get(&app_url)
            .header(USER_AGENT, http::random_user_agent())
            .timeout(SECRET_TIMEOUT)
            .send()
            .await
            .map_err(PlatformError::SecretFetch)?
            .text()
            .await
            .map_err(PlatformError::SecretFetch)?;

        let secret = decode_secret(&script)?;
        info!("Obtained Musixmatch signing secret");
        Ok(secret)
    }
}

#[async_trait]
impl LyricsPlatform for Musixmatch {
    async fn get_lyrics(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Option<LyricsResult>, PlatformError> {
        let query = if artist.is_empty() {
            title.to_string()
        } else {
            format!("{} {}", artist, title)
        };

        let Some(results) = self.search_tracks(&query, 1).await? else {
            return Ok(None);
        };
        let Some(track_id) = results["message"]["body"]["track_list"][0]["track"]["track_id"].as_u64() else {
            debug!("No Musixmatch tracks for {}", query);
            return Ok(None);
        };

        self.lyrics_for(&TrackRef::Id(track_id)).await
    }

    fn kind(&self) -> PlatformKind {
        PlatformKind::Musixmatch
    }
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn app_url_regex() -> &'static Regex {
    static APP: OnceLock<Regex> = OnceLock::new();
    APP.get_or_init(|| {
        Regex::new(r#"src="([^"]*/_next/static/chunks/pages/_app-[^"]+\.js)""#).expect("valid app bundle regex")
    })
}

fn secret_regex() -> &'static Regex {
    static SECRET: OnceLock<Regex> = OnceLock::new();
    SECRET.get_or_init(|| Regex::new(r#"from\(\s*"(.*?)"\s*\.split"#).expect("valid secret regex"))
}

/// URL of the last `_app` bundle referenced by the page, resolved against the site.
pub fn find_app_url(html: &str, site_url: &str) -> Option<String> {
    let src = app_url_regex().captures_iter(html).last()?.get(1)?.as_str();
    let base = url::Url::parse(site_url).ok()?;
    base.join(src).ok().map(String::from)
}

/// Pull the reversed base64 secret out of the bundle and decode it.
pub fn decode_secret(script: &str) -> Result<String, PlatformError> {
    let encoded = secret_regex()
        .captures(script)
        .and_then(|caps| caps.get(1))
        .ok_or(PlatformError::SecretNotFound)?
        .as_str();

    let reversed: String = encoded.chars().rev().collect();
    let bytes = BASE64
        .decode(reversed.as_bytes())
        .map_err(|e| PlatformError::SecretDecode { reason: e.to_string() })?;

    String::from_utf8(bytes).map_err(|e| PlatformError::SecretDecode { reason: e.to_string() })
}

/// Query suffix carrying `HMAC-SHA256(secret, url + yyyymmdd)`.
pub fn signature_params(secret: &str, url: &str, date: NaiveDate) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let message = format!("{}{}", url, date.format("%Y%m%d"));
    let tag = hmac::sign(&key, message.as_bytes());

    format!(
        "&signature={}&signature_protocol=sha256",
        encode(&BASE64.encode(tag.as_ref()))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lyrics::DEFAULT_SECTION;
    use crate::core::platforms::test_server::TestServer;
    use std::sync::Arc;

    const SEARCH_PAGE: &str = r#"<html><head>
        <script src="/_next/static/chunks/pages/_app-old.js"></script>
        <script src="/_next/static/chunks/pages/_app-1a2b3c.js"></script>
    </head></html>"#;

    // "mysecret-key", base64-encoded and reversed
    const APP_SCRIPT: &str = r#"var a=1;const k=Buffer.from( "5V2atQXZyNWZzlXb" .split("").reverse().join(""),"base64");"#;

    const SEARCH_JSON: &str = r#"{"message":{"header":{"status_code":200},"body":{"track_list":[{"track":{"track_id":84231,"track_name":"Bohemian Rhapsody"}}]}}}"#;
    const LYRICS_JSON: &str = r#"{"message":{"header":{"status_code":200},"body":{"lyrics":{"lyrics_id":1,"lyrics_body":"Is this the real life?\nIs this just fantasy?"}}}}"#;

    fn site_routes() -> Vec<(&'static str, u16, &'static str)> {
        vec![
            ("/search", 200, SEARCH_PAGE),
            ("/_next/static/chunks/pages/_app-1a2b3c.js", 200, APP_SCRIPT),
        ]
    }

    fn client(server: &TestServer) -> Musixmatch {
        Musixmatch::new(&server.url("/ws/1.1/"), server.base_url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_find_app_url_takes_last_and_resolves() {
        assert_eq!(
            find_app_url(SEARCH_PAGE, "https://www.musixmatch.com").unwrap(),
            "https://www.musixmatch.com/_next/static/chunks/pages/_app-1a2b3c.js"
        );
        let absolute = r#"<script src="https://s.mxmcdn.net/site/_next/static/chunks/pages/_app-9.js">"#;
        assert_eq!(
            find_app_url(absolute, "https://www.musixmatch.com").unwrap(),
            "https://s.mxmcdn.net/site/_next/static/chunks/pages/_app-9.js"
        );
        assert_eq!(find_app_url("<html></html>", "https://www.musixmatch.com"), None);
    }

    #[test]
    fn test_decode_secret() {
        assert_eq!(decode_secret(APP_SCRIPT).unwrap(), "mysecret-key");
        assert!(matches!(decode_secret("nothing here"), Err(PlatformError::SecretNotFound)));
        assert!(matches!(
            decode_secret(r#"from("!!notbase64" .split"#),
            Err(PlatformError::SecretDecode { .. })
        ));
    }

    #[test]
    fn test_signature_matches_reference_vector() {
        let url = "https://www.musixmatch.com/ws/1.1/track.search?app_id=web-desktop-app-v1.0&format=json&q=queen+bohemian&f_has_lyrics=true&page_size=5&page=1";
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();

        assert_eq!(
            signature_params("mysecret-key", url, date),
            "&signature=VybDxQMC%2BQawWRfKXj7wmCoVrJhPKaCvnthdyBhZ2AI%3D&signature_protocol=sha256"
        );
    }

    #[test]
    fn test_signature_depends_on_date() {
        let url = "https://example.com/ws/1.1/track.search";
        let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        assert_eq!(signature_params("k", url, monday), signature_params("k", url, monday));
        assert_ne!(signature_params("k", url, monday), signature_params("k", url, tuesday));
    }

    #[test]
    fn test_track_ref_params() {
        assert_eq!(TrackRef::Id(42).query_param(), "track_id=42");
        assert_eq!(TrackRef::Isrc("GBUM71029604".into()).query_param(), "track_isrc=GBUM71029604");
    }

    #[tokio::test]
    async fn test_get_lyrics_signs_requests_and_caches_secret() {
        let mut routes = site_routes();
        routes.push(("/ws/1.1/track.search", 200, SEARCH_JSON));
        routes.push(("/ws/1.1/track.lyrics.get", 200, LYRICS_JSON));
        let server = TestServer::start(routes).await;
        let musixmatch = client(&server);

        let result = musixmatch.get_lyrics("Bohemian Rhapsody", "Queen").await.unwrap().unwrap();
        assert_eq!(
            result.get(DEFAULT_SECTION),
            Some("Is this the real life?\nIs this just fantasy?")
        );

        musixmatch.get_lyrics("Bohemian Rhapsody", "Queen").await.unwrap();
        assert_eq!(server.hits("/_next/static/chunks/pages/_app-1a2b3c.js"), 1);

        let api_calls: Vec<String> = server
            .requests()
            .into_iter()
            .filter(|r| r.contains("/ws/1.1/"))
            .collect();
        assert_eq!(api_calls.len(), 4);
        assert!(api_calls[0].contains("q=Queen+Bohemian+Rhapsody"));
        assert!(api_calls.iter().all(|r| r.contains("&signature_protocol=sha256")));
        assert!(api_calls[1].contains("track_id=84231"));
    }

    #[tokio::test]
    async fn test_lyrics_by_isrc_skips_search() {
        let mut routes = site_routes();
        routes.push(("/ws/1.1/track.lyrics.get", 200, LYRICS_JSON));
        let server = TestServer::start(routes).await;
        let musixmatch = client(&server);

        let result = musixmatch
            .lyrics_for(&TrackRef::Isrc("GBUM71029604".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert!(result.get(DEFAULT_SECTION).unwrap().starts_with("Is this the real life?"));

        assert_eq!(server.hits("/ws/1.1/track.search"), 0);
        let lyrics_call = server
            .requests()
            .into_iter()
            .find(|r| r.contains("/ws/1.1/track.lyrics.get"))
            .unwrap();
        assert!(lyrics_call.contains("track_isrc=GBUM71029604"));
        assert!(lyrics_call.contains("&signature_protocol=sha256"));
    }

    #[tokio::test]
    async fn test_concurrent_callers_fetch_secret_once() {
        let mut routes = site_routes();
        routes.push(("/ws/1.1/track.search", 200, SEARCH_JSON));
        routes.push(("/ws/1.1/track.lyrics.get", 200, LYRICS_JSON));
        let server = TestServer::start(routes).await;
        let musixmatch = Arc::new(client(&server));

        let calls = (0..4).map(|_| {
            let musixmatch = musixmatch.clone();
            async move { musixmatch.get_lyrics("Bohemian Rhapsody", "Queen").await }
        });
        for outcome in futures::future::join_all(calls).await {
            assert!(outcome.unwrap().is_some());
        }

        assert_eq!(server.hits("/search"), 1);
    }

    #[tokio::test]
    async fn test_missing_bundle_is_fatal() {
        let server = TestServer::start(vec![("/search", 200, "<html>redesigned</html>")]).await;

        let err = client(&server).get_lyrics("Bohemian Rhapsody", "Queen").await.unwrap_err();
        assert!(matches!(err, PlatformError::AppBundleNotFound));
    }

    #[tokio::test]
    async fn test_missing_secret_is_fatal() {
        let server = TestServer::start(vec![
            ("/search", 200, SEARCH_PAGE),
            ("/_next/static/chunks/pages/_app-1a2b3c.js", 200, "console.log('no secret')"),
        ])
        .await;

        let err = client(&server).get_lyrics("Bohemian Rhapsody", "Queen").await.unwrap_err();
        assert!(matches!(err, PlatformError::SecretNotFound));
    }

    #[tokio::test]
    async fn test_api_errors_are_absent() {
        let mut routes = site_routes();
        routes.push(("/ws/1.1/track.search", 503, "unavailable"));
        let server = TestServer::start(routes).await;

        assert_eq!(client(&server).get_lyrics("Bohemian Rhapsody", "").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_track_list_is_absent() {
        let mut routes = site_routes();
        routes.push((
            "/ws/1.1/track.search",
            200,
            r#"{"message":{"header":{"status_code":200},"body":{"track_list":[]}}}"#,
        ));
        let server = TestServer::start(routes).await;

        assert_eq!(client(&server).get_lyrics("Unknown", "Nobody").await.unwrap(), None);
        assert_eq!(server.hits("/ws/1.1/track.lyrics.get"), 0);
    }
}
