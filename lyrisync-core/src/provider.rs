use crate::lyrics::{Cue, SyncedLine, UnsyncedLine};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Query parameters for a lyrics lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricsQuery {
    /// Track URI, echoed back in the result
    pub uri: String,
    /// Track title
    pub title: String,
    /// Artist name
    pub artist: String,
    /// Track duration in seconds (optional)
    pub duration_secs: Option<u32>,
}

impl LyricsQuery {
    /// Create a new lyrics query
    pub fn new(
        uri: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            title: title.into(),
            artist: artist.into(),
            duration_secs: None,
        }
    }

    /// Set duration
    #[must_use]
    pub const fn with_duration(mut self, duration_secs: u32) -> Self {
        self.duration_secs = Some(duration_secs);
        self
    }

    /// Both title and artist must be non-blank for a lookup to run
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty() && !self.artist.trim().is_empty()
    }

    /// Free-text search term for providers with a generic song search
    #[must_use]
    pub fn search_term(&self) -> String {
        format!("{} {}", self.artist.trim(), self.title.trim())
    }
}

/// Why a lookup produced no lyrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// No index entry or search candidate matched the query
    NotFound,
    /// The payload was fetched but matches no known shape
    InvalidFormat,
    /// The payload parsed but yielded zero usable lines
    EmptyLyrics,
    /// A fetch failed or was rejected
    NetworkError,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::InvalidFormat => "InvalidFormat",
            Self::EmptyLyrics => "EmptyLyrics",
            Self::NetworkError => "NetworkError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a lyrics lookup.
///
/// `error` is set exactly when all three content fields are `None`. Partial
/// content (for example karaoke cues without an unsynced form) is still a
/// success.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricsResult {
    pub uri: String,
    pub provider: String,
    pub karaoke: Option<Vec<Cue>>,
    pub synced: Option<Vec<SyncedLine>>,
    pub unsynced: Option<Vec<UnsyncedLine>>,
    pub copyright: Option<String>,
    pub error: Option<ErrorKind>,
}

impl LyricsResult {
    /// Build an error result with every content field empty
    pub fn failure(uri: impl Into<String>, provider: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            uri: uri.into(),
            provider: provider.into(),
            karaoke: None,
            synced: None,
            unsynced: None,
            copyright: None,
            error: Some(kind),
        }
    }

    /// Check if lyrics were found
    #[must_use]
    pub const fn is_found(&self) -> bool {
        self.error.is_none()
    }

    /// Get plain text content, one line per row
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.unsynced.as_ref().map(|lines| {
            lines
                .iter()
                .map(|l| l.text.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        })
    }
}

/// Capability shared by every lyrics provider.
///
/// Implementations never fail: every error is folded into
/// [`LyricsResult::error`].
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &'static str;

    /// Look up lyrics for a query
    async fn find_lyrics(&self, query: &LyricsQuery) -> LyricsResult;
}
