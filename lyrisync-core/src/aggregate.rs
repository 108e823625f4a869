//! Assembly of converted lines into karaoke, synced and unsynced forms.

use crate::convert::{convert_background, convert_line, WORD_GAP_TOLERANCE_MS};
use crate::lyrics::{plain_text, Cue, KaraokeWord, SyncedLine, UnsyncedLine};
use crate::raw::{RawLine, RawLyrics};
use crate::time::TimeUnit;

/// Placeholder some providers use for instrumental breaks
const INSTRUMENTAL_MARKER: &str = "♪";

/// One raw line in all three output forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedLine {
    pub cue: Cue,
    pub synced: SyncedLine,
    /// Empty when the line has no text worth showing without timing
    pub unsynced_text: String,
}

/// Three parallel sequences ordered by start time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedLyrics {
    pub karaoke: Vec<Cue>,
    pub synced: Vec<SyncedLine>,
    pub unsynced: Vec<UnsyncedLine>,
}

impl AggregatedLyrics {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.karaoke.is_empty() && self.synced.is_empty() && self.unsynced.is_empty()
    }
}

/// Convert and combine one raw line.
///
/// Returns `None` for a line with neither main nor background words.
#[must_use]
pub fn aggregate_line(line: &RawLine, unit: TimeUnit) -> Option<AggregatedLine> {
    if line.words.is_empty() && line.background.is_empty() {
        return None;
    }

    let main_start = line
        .words
        .iter()
        .map(|w| w.start_ms(unit))
        .fold(unit.to_millis(line.start), u64::min);
    let main_end = line
        .words
        .iter()
        .map(|w| w.end_ms(unit))
        .fold(unit.to_millis(line.end), u64::max);

    let background_span = line.background.first().map(|first| {
        let start = first.start_ms(unit);
        let end = line
            .background
            .iter()
            .map(|w| w.end_ms(unit))
            .fold(start, u64::max);
        (start, end)
    });

    let (line_start, line_end) = match background_span {
        Some((bg_start, bg_end)) => (main_start.min(bg_start), main_end.max(bg_end)),
        None => (main_start, main_end),
    };

    let mut words = convert_line(&line.words, line_start, false, unit);
    pad_to_end(&mut words, line_end);
    let background_words = convert_background(&line.background, unit);

    let is_background_line =
        !line.words.is_empty() && line.words.iter().all(|w| w.is_background);

    let main_text = plain_text(&words);
    let background_text = plain_text(&background_words);

    let translation = line
        .translation
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let synced = SyncedLine {
        start_time_ms: line_start,
        end_time_ms: line_end,
        text: translation.map_or_else(|| main_text.clone(), str::to_string),
        original_text: translation.map(|_| main_text.clone()),
        background: (!background_text.is_empty()).then(|| background_text.clone()),
    };

    let unsynced_text = if main_text == INSTRUMENTAL_MARKER && background_text.is_empty() {
        String::new()
    } else if background_text.is_empty() {
        main_text
    } else {
        format!("{main_text} ({background_text})").trim().to_string()
    };

    let cue = Cue {
        start_time_ms: line_start,
        end_time_ms: line_end,
        words,
        is_background_line,
        background_words: (!background_words.is_empty()).then_some(background_words),
    };

    Some(AggregatedLine {
        cue,
        synced,
        unsynced_text,
    })
}

/// Aggregate every line of a payload.
///
/// Lines are stable-sorted by start time since providers do not guarantee
/// ordering. Lines without text are kept in the timed forms but left out
/// of the unsynced form.
#[must_use]
pub fn aggregate(raw: &RawLyrics) -> AggregatedLyrics {
    let mut lines: Vec<AggregatedLine> = raw
        .lines
        .iter()
        .filter_map(|line| aggregate_line(line, raw.unit))
        .collect();
    lines.sort_by_key(|l| l.cue.start_time_ms);

    let mut out = AggregatedLyrics::default();
    for line in lines {
        if !line.unsynced_text.is_empty() {
            out.unsynced.push(UnsyncedLine {
                text: line.unsynced_text,
            });
        }
        out.karaoke.push(line.cue);
        out.synced.push(line.synced);
    }
    out
}

/// Close a trailing gap so the main track spans the whole cue.
fn pad_to_end(words: &mut Vec<KaraokeWord>, line_end: u64) {
    let Some(last) = words.last() else {
        return;
    };
    let cursor = last.start_time_ms.unwrap_or(0) + last.duration_ms;
    let gap = line_end.saturating_sub(cursor);
    if gap > WORD_GAP_TOLERANCE_MS {
        words.push(KaraokeWord::spacer(cursor, gap, false));
    }
}
