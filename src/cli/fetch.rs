use clap::Args;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::core::lyrics::{LyricsResult, DEFAULT_SECTION};
use crate::core::platforms::PlatformKind;
use crate::core::services::{LyricsService, PlatformOutcome};
use crate::error::{AppError, Result};

#[derive(Args)]
pub struct FetchArgs {
    /// Song title
    #[arg(value_name = "TITLE")]
    title: Option<String>,

    /// Artist name
    #[arg(short, long)]
    artist: Option<String>,

    /// Ask only this platform (a_zlyrics, genius, lyrist, lrclib, musixmatch)
    #[arg(short, long, conflicts_with = "all")]
    platform: Option<PlatformKind>,

    /// Look the recording up on Musixmatch by ISRC instead of by name
    #[arg(long, conflicts_with_all = ["platform", "all", "title", "artist"])]
    isrc: Option<String>,

    /// Ask every enabled platform concurrently and print each hit
    #[arg(long)]
    all: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: String,
}

pub async fn execute(args: FetchArgs, service: &LyricsService) -> Result<()> {
    let title = args.title.as_deref().unwrap_or("").trim();
    let artist = args.artist.as_deref().unwrap_or("").trim();

    if args.isrc.is_none() && title.is_empty() && artist.is_empty() {
        return Err(AppError::Validation(
            "Provide a title, an artist (-a), or both".to_string(),
        ));
    }

    let json = match args.format.as_str() {
        "json" => true,
        "text" => false,
        other => {
            return Err(AppError::Validation(format!(
                "Unknown output format '{}' (expected text or json)",
                other
            )))
        }
    };

    if args.all {
        return fetch_all(service, title, artist, json).await;
    }

    let found = match (&args.isrc, args.platform) {
        (Some(isrc), _) => service
            .fetch_by_isrc(isrc)
            .await?
            .map(|lyrics| (PlatformKind::Musixmatch, lyrics)),
        (None, Some(kind)) => service
            .fetch(kind, title, artist)
            .await?
            .map(|lyrics| (kind, lyrics)),
        (None, None) => service.fetch_first(title, artist).await?,
    };

    match (found, json) {
        (Some((kind, lyrics)), true) => {
            println!("{}", json!({ "platform": kind, "lyrics": lyrics }));
        }
        (Some((kind, lyrics)), false) => {
            info!("Lyrics from {}", kind);
            print!("{}", render_text(&lyrics));
        }
        (None, true) => {
            let platform = args.isrc.as_ref().map(|_| PlatformKind::Musixmatch).or(args.platform);
            println!("{}", json!({ "platform": platform, "lyrics": Value::Null }));
        }
        (None, false) => match &args.isrc {
            Some(isrc) => info!("No lyrics found for ISRC {}", isrc),
            None => info!("No lyrics found for: {} - {}", artist, title),
        },
    }

    Ok(())
}

async fn fetch_all(service: &LyricsService, title: &str, artist: &str, json: bool) -> Result<()> {
    let enabled: Vec<&str> = service.enabled().iter().map(|k| k.as_str()).collect();
    info!("Asking {} platforms: {}", enabled.len(), enabled.join(", "));

    let outcomes: Vec<PlatformOutcome> = service.fetch_all(title, artist).await;
    let mut report = Vec::with_capacity(outcomes.len());
    let mut hits = 0;

    for outcome in outcomes {
        match outcome.result {
            Ok(Some(lyrics)) => {
                hits += 1;
                if json {
                    report.push(json!({ "platform": outcome.kind, "lyrics": lyrics }));
                } else {
                    println!("=== {} ===", outcome.kind);
                    print!("{}", render_text(&lyrics));
                    println!();
                }
            }
            Ok(None) => {
                if json {
                    report.push(json!({ "platform": outcome.kind, "lyrics": Value::Null }));
                }
            }
            Err(e) => {
                warn!("{} failed: {}", outcome.kind, e);
                if json {
                    report.push(json!({ "platform": outcome.kind, "error": e.to_string() }));
                }
            }
        }
    }

    if json {
        let rendered = serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?;
        println!("{}", rendered);
    } else if hits == 0 {
        info!("No lyrics found for: {} - {}", artist, title);
    }

    Ok(())
}

/// Plain-text rendering: named sections get a `[label]` header.
pub fn render_text(lyrics: &LyricsResult) -> String {
    let mut out = String::new();
    if lyrics.is_empty() {
        return out;
    }
    for (i, section) in lyrics.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if section.label != DEFAULT_SECTION {
            out.push_str(&format!("[{}]\n", section.label));
        }
        out.push_str(section.text.trim_end());
        out.push('\n');
    }
    out
}
