//! Lyrics lookup service
//!
//! Owns the configured platforms and decides which of them to ask:
//! a single platform, the first hit in preference order, or all at once.

pub mod lyrics;

pub use lyrics::{LyricsService, PlatformOutcome};
