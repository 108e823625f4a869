//! Index and payload wire formats.
//!
//! Payload timestamps are milliseconds. A line's `text` is either a list of
//! timed syllables or, for line-synced songs, a plain string.

use lyrisync_core::{CoreError, IndexEntry, RawLine, RawLyrics, RawWord, TimeUnit};
use serde::Deserialize;

/// One record of the curated index
#[derive(Debug, Deserialize)]
struct IndexRecord {
    #[serde(default)]
    artist: Option<String>,
    title: String,
    path: String,
}

/// Parse the curated index. A missing or null artist becomes "".
///
/// # Errors
///
/// Returns an error if the body is not a JSON array of index records.
pub fn parse_index(body: &str) -> Result<Vec<IndexEntry>, CoreError> {
    let records: Vec<IndexRecord> = serde_json::from_str(body)?;
    Ok(records
        .into_iter()
        .map(|r| IndexEntry::new(r.artist.unwrap_or_default(), r.title, r.path))
        .collect())
}

#[derive(Debug, Deserialize)]
struct ContentPayload {
    content: Option<Vec<ContentLine>>,
    metadata: Option<ContentMetadata>,
}

#[derive(Debug, Deserialize)]
struct ContentMetadata {
    copyright: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentLine {
    timestamp: Option<f64>,
    endtime: Option<f64>,
    #[serde(default)]
    text: Option<LineText>,
    #[serde(default)]
    background_text: Vec<Syllable>,
    translation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LineText {
    Syllables(Vec<Syllable>),
    Plain(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Syllable {
    #[serde(default)]
    text: String,
    timestamp: Option<f64>,
    endtime: Option<f64>,
    duration: Option<f64>,
    /// Syllable is part of a word that continues in the next syllable
    #[serde(default)]
    part: bool,
    #[serde(default)]
    is_background: bool,
}

impl Syllable {
    fn into_raw(self, line: usize, background: bool) -> Result<RawWord, CoreError> {
        let start = self.timestamp.ok_or_else(|| {
            CoreError::invalid_format(format!("line {line}: syllable {:?} has no timestamp", self.text))
        })?;
        if self.endtime.is_none() && self.duration.is_none() {
            return Err(CoreError::invalid_format(format!(
                "line {line}: syllable {:?} has neither endtime nor duration",
                self.text
            )));
        }
        Ok(RawWord {
            text: self.text,
            start,
            end: self.endtime,
            duration: self.duration,
            is_background: background || self.is_background,
            continues_without_space: self.part,
        })
    }
}

impl ContentLine {
    fn into_raw(self, index: usize) -> Result<RawLine, CoreError> {
        let start = self
            .timestamp
            .ok_or_else(|| CoreError::invalid_format(format!("line {index} has no timestamp")))?;

        let words = match self.text {
            Some(LineText::Syllables(syllables)) => syllables
                .into_iter()
                .map(|s| s.into_raw(index, false))
                .collect::<Result<Vec<_>, _>>()?,
            Some(LineText::Plain(text)) if !text.trim().is_empty() => {
                let end = self.endtime.ok_or_else(|| {
                    CoreError::invalid_format(format!("line-synced line {index} has no endtime"))
                })?;
                vec![RawWord::new(text, start, end)]
            }
            Some(LineText::Plain(_)) | None => Vec::new(),
        };

        let background = self
            .background_text
            .into_iter()
            .map(|s| s.into_raw(index, true))
            .collect::<Result<Vec<_>, _>>()?;

        let last_end = words
            .iter()
            .chain(&background)
            .map(|w| w.end.unwrap_or(w.start + w.duration.unwrap_or(0.0)))
            .fold(start, f64::max);

        Ok(RawLine {
            start,
            end: self.endtime.unwrap_or(last_end),
            words,
            background,
            translation: self.translation,
        })
    }
}

/// Parse a lyrics payload into raw lyrics.
///
/// # Errors
///
/// Returns [`CoreError::Json`] if the body is not valid JSON for this shape,
/// or [`CoreError::InvalidFormat`] if required fields are missing.
pub fn parse_payload(body: &str) -> Result<RawLyrics, CoreError> {
    let payload: ContentPayload = serde_json::from_str(body)?;
    let content = payload
        .content
        .ok_or_else(|| CoreError::invalid_format("payload has no content"))?;

    let lines = content
        .into_iter()
        .enumerate()
        .map(|(i, line)| line.into_raw(i))
        .collect::<Result<Vec<_>, _>>()?;

    let mut raw = RawLyrics::new(TimeUnit::Milliseconds, lines);
    raw.copyright = payload.metadata.and_then(|m| m.copyright);
    Ok(raw)
}
