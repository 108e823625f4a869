//! Normalized lyrics representation handed to the renderer.
//!
//! All times are milliseconds from the start of the track.

use serde::Serialize;

/// A single timed token in a karaoke cue.
///
/// A renderer advances playback position by summing `duration_ms` over the
/// words of a cue, so timing gaps are represented by spacer words with empty
/// text rather than being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KaraokeWord {
    pub text: String,
    pub duration_ms: u64,
    pub is_background: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time_ms: Option<u64>,
}

impl KaraokeWord {
    /// Create a spacer covering a gap of `duration_ms` starting at `start_ms`
    #[must_use]
    pub const fn spacer(start_ms: u64, duration_ms: u64, is_background: bool) -> Self {
        Self {
            text: String::new(),
            duration_ms,
            is_background,
            start_time_ms: Some(start_ms),
        }
    }

    /// Spacers carry timing only
    #[must_use]
    pub fn is_spacer(&self) -> bool {
        self.text.is_empty()
    }
}

/// One lyric line with word-level timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cue {
    pub start_time_ms: u64,
    pub end_time_ms: u64,
    pub words: Vec<KaraokeWord>,
    pub is_background_line: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_words: Option<Vec<KaraokeWord>>,
}

impl Cue {
    /// Sum of the main track word durations
    #[must_use]
    pub fn main_duration_ms(&self) -> u64 {
        self.words.iter().map(|w| w.duration_ms).sum()
    }
}

/// One lyric line with line-level timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncedLine {
    pub start_time_ms: u64,
    pub end_time_ms: u64,
    pub text: String,
    /// Untranslated text when `text` holds a translation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

/// One lyric line without timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsyncedLine {
    pub text: String,
}

/// Concatenate word texts (each already carrying its own spacing) and trim.
#[must_use]
pub fn plain_text(words: &[KaraokeWord]) -> String {
    words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<String>()
        .trim()
        .to_string()
}
