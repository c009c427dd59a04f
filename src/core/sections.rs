//! Re-segmentation of scraped lyrics blocks into labelled sections.
//!
//! Scraped pages mark song structure inline, e.g. `[Chorus:]` or
//! `[Freddie Mercury:]`, on a line of its own.

use regex::Regex;
use std::sync::OnceLock;

use crate::core::lyrics::LyricsResult;

fn marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"\[[^\[\]\r\n]+:\]").expect("valid section marker regex"))
}

/// Split `block` around section markers, keeping the markers as fragments.
///
/// Empty fragments are dropped; whitespace-only ones are kept.
pub fn split_fragments(block: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut last = 0;

    for marker in marker_regex().find_iter(block) {
        fragments.push(&block[last..marker.start()]);
        fragments.push(marker.as_str());
        last = marker.end();
    }
    fragments.push(&block[last..]);

    fragments.retain(|f| !f.is_empty());
    fragments
}

/// Turn a lyrics block into sections.
///
/// With more than one fragment, an odd trailing fragment is discarded and the
/// rest pair up as marker then text. Otherwise the whole block becomes the
/// `"default"` section.
pub fn split_sections(block: &str) -> LyricsResult {
    let mut fragments = split_fragments(block);

    if fragments.len() <= 1 {
        let text = fragments.first().copied().unwrap_or_default();
        return LyricsResult::single(clear_text(text));
    }

    if fragments.len() % 2 != 0 {
        fragments.pop();
    }

    let mut result = LyricsResult::new();
    for pair in fragments.chunks_exact(2) {
        result.insert(marker_label(pair[0]), clear_text(pair[1]));
    }
    result
}

fn marker_label(marker: &str) -> String {
    marker.replace('[', "").replace(":]", "")
}

/// Drop one leading blank line left behind by the marker line.
pub fn clear_text(text: &str) -> String {
    text.strip_prefix("\n\n").unwrap_or(text).to_string()
}
