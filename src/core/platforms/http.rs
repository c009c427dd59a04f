//! HTTP plumbing shared by the lyrics platforms.

use rand::seq::IndexedRandom;
use reqwest::header::USER_AGENT;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::{NetworkError, PlatformError};

/// Browser user agents rotated per request; several sources refuse
/// non-browser clients.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 6.1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/41.0.2228.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_10_1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/41.0.2227.1 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/535.11 (KHTML, like Gecko) Chrome/17.0.963.66 Safari/535.11",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",
];

pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

pub fn build_client(timeout: Duration) -> Result<reqwest::Client, PlatformError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(PlatformError::Client)
}

/// Send with a random user agent; anything but 200 is an error.
pub async fn send(request: RequestBuilder) -> Result<Response, NetworkError> {
    let response = request
        .header(USER_AGENT, random_user_agent())
        .send()
        .await?;

    if response.status() != StatusCode::OK {
        return Err(NetworkError::Status {
            status: response.status().as_u16(),
            url: response.url().to_string(),
        });
    }

    Ok(response)
}

pub async fn get_text(request: RequestBuilder) -> Result<String, NetworkError> {
    Ok(send(request).await?.text().await?)
}

pub async fn get_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, NetworkError> {
    let body = get_text(request).await?;
    serde_json::from_str(&body).map_err(|e| NetworkError::InvalidResponse {
        reason: e.to_string(),
    })
}

/// Collapse a transient failure into an absent value.
pub fn soft<T>(platform: &str, outcome: Result<T, NetworkError>) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("{} request failed: {}", platform, e);
            None
        }
    }
}
