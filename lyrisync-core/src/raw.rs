//! Provider-neutral raw lyrics.
//!
//! Each provider deserializes its own JSON shape and converts it into these
//! types. Timestamps keep the provider's unit; [`RawLyrics::unit`] records
//! which one so the converter can normalize to milliseconds.

use crate::time::TimeUnit;

/// A timed token as reported by a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RawWord {
    pub text: String,
    pub start: f64,
    pub end: Option<f64>,
    /// Explicit duration, used when `end` is absent
    pub duration: Option<f64>,
    pub is_background: bool,
    /// The next token follows without a space (syllables of one word)
    pub continues_without_space: bool,
}

impl RawWord {
    /// A standalone word spanning `start..end`, followed by a space
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end: Some(end),
            duration: None,
            is_background: false,
            continues_without_space: false,
        }
    }

    #[must_use]
    pub const fn background(mut self) -> Self {
        self.is_background = true;
        self
    }

    #[must_use]
    pub const fn glued(mut self) -> Self {
        self.continues_without_space = true;
        self
    }

    /// Start time in milliseconds
    #[must_use]
    pub fn start_ms(&self, unit: TimeUnit) -> u64 {
        unit.to_millis(self.start)
    }

    /// End time in milliseconds: `end`, else `start + duration`, else `start`
    #[must_use]
    pub fn end_ms(&self, unit: TimeUnit) -> u64 {
        match (self.end, self.duration) {
            (Some(end), _) => unit.to_millis(end),
            (None, Some(duration)) => self.start_ms(unit).saturating_add(unit.to_millis(duration)),
            (None, None) => self.start_ms(unit),
        }
    }
}

/// One provider line: main vocal words plus an optional background track.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawLine {
    pub start: f64,
    pub end: f64,
    pub words: Vec<RawWord>,
    pub background: Vec<RawWord>,
    pub translation: Option<String>,
}

/// A full provider payload after shape-specific parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLyrics {
    pub unit: TimeUnit,
    pub lines: Vec<RawLine>,
    pub copyright: Option<String>,
    /// Independent plain-text form, when the provider ships one
    pub plain_lines: Option<Vec<String>>,
}

impl RawLyrics {
    #[must_use]
    pub const fn new(unit: TimeUnit, lines: Vec<RawLine>) -> Self {
        Self {
            unit,
            lines,
            copyright: None,
            plain_lines: None,
        }
    }
}
