//! Search and payload wire formats.
//!
//! Payload timestamps are seconds.

use lyrisync_core::{CoreError, RawLine, RawLyrics, RawWord, SearchCandidate, TimeUnit};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchHit {
    title: String,
    #[serde(default)]
    artist: String,
    id: HitId,
    album: Option<String>,
    artwork_url: Option<String>,
}

/// Search ids come back as numbers or strings depending on the backend
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HitId {
    Number(u64),
    Text(String),
}

impl From<HitId> for String {
    fn from(id: HitId) -> Self {
        match id {
            HitId::Number(n) => n.to_string(),
            HitId::Text(s) => s,
        }
    }
}

/// Parse a search response into candidates, preserving ranking order.
///
/// # Errors
///
/// Returns an error if the body is not a valid search response.
pub fn parse_search(body: &str) -> Result<Vec<SearchCandidate>, CoreError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response
        .results
        .into_iter()
        .map(|hit| SearchCandidate {
            title: hit.title,
            artist: hit.artist,
            external_id: hit.id.into(),
            album: hit.album,
            artwork_url: hit.artwork_url,
        })
        .collect())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinesPayload {
    lines: Option<Vec<TimedLine>>,
    copyright: Option<String>,
    plain_lyrics: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimedLine {
    begin: f64,
    end: f64,
    #[serde(default)]
    text: String,
    translation: Option<String>,
    #[serde(default)]
    words: Vec<TimedWord>,
    background_vocal: Option<BackgroundVocal>,
}

#[derive(Debug, Deserialize)]
struct BackgroundVocal {
    #[serde(default)]
    words: Vec<TimedWord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimedWord {
    text: String,
    begin: f64,
    end: f64,
    #[serde(default = "default_space_after")]
    has_space_after: bool,
}

const fn default_space_after() -> bool {
    true
}

impl TimedWord {
    fn into_raw(self, background: bool) -> RawWord {
        let word = RawWord::new(self.text, self.begin, self.end);
        let word = if background { word.background() } else { word };
        if self.has_space_after {
            word
        } else {
            word.glued()
        }
    }
}

impl From<TimedLine> for RawLine {
    fn from(line: TimedLine) -> Self {
        let words = if line.words.is_empty() {
            // Line-synced only: the whole line is one token
            if line.text.trim().is_empty() {
                Vec::new()
            } else {
                vec![RawWord::new(line.text, line.begin, line.end)]
            }
        } else {
            line.words.into_iter().map(|w| w.into_raw(false)).collect()
        };

        let background = line
            .background_vocal
            .map(|bg| bg.words.into_iter().map(|w| w.into_raw(true)).collect())
            .unwrap_or_default();

        Self {
            start: line.begin,
            end: line.end,
            words,
            background,
            translation: line.translation,
        }
    }
}

/// Parse a lyrics payload into raw lyrics.
///
/// # Errors
///
/// Returns [`CoreError::Json`] if the body is not valid JSON for this shape,
/// or [`CoreError::InvalidFormat`] if it has no `lines`.
pub fn parse_payload(body: &str) -> Result<RawLyrics, CoreError> {
    let payload: LinesPayload = serde_json::from_str(body)?;
    let lines = payload
        .lines
        .ok_or_else(|| CoreError::invalid_format("payload has no lines"))?;

    let mut raw = RawLyrics::new(TimeUnit::Seconds, lines.into_iter().map(RawLine::from).collect());
    raw.copyright = payload.copyright.filter(|c| !c.trim().is_empty());
    raw.plain_lines = payload
        .plain_lyrics
        .map(|text| text.lines().map(str::to_string).collect());
    Ok(raw)
}
