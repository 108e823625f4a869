//! Conversion of raw timed words into gap-filled karaoke words.

use crate::lyrics::KaraokeWord;
use crate::raw::RawWord;
use crate::time::TimeUnit;

/// Gaps between words up to this many milliseconds are not filled
pub const WORD_GAP_TOLERANCE_MS: u64 = 10;

/// Convert one line's raw words into karaoke words.
///
/// A cursor starts at `line_start_ms` and follows the end of each word.
/// When the next word starts more than [`WORD_GAP_TOLERANCE_MS`] after the
/// cursor, an empty spacer covering the gap is emitted first, so summing
/// durations from `line_start_ms` reconstructs each word's absolute start.
///
/// `is_background` marks the whole sequence (spacers included) as
/// background vocals. Words are expected in temporal order; a word that
/// starts before the cursor (before `line_start_ms`, or overlapping the
/// previous word) is clipped to start at the cursor.
#[must_use]
pub fn convert_line(
    words: &[RawWord],
    line_start_ms: u64,
    is_background: bool,
    unit: TimeUnit,
) -> Vec<KaraokeWord> {
    let mut out = Vec::with_capacity(words.len() * 2);
    let mut cursor = line_start_ms;

    for word in words {
        let start = word.start_ms(unit).max(cursor);
        let end = word.end_ms(unit).max(start);

        let gap = start.saturating_sub(cursor);
        if gap > WORD_GAP_TOLERANCE_MS {
            out.push(KaraokeWord::spacer(cursor, gap, is_background));
        }

        let background = is_background || word.is_background;
        out.push(KaraokeWord {
            text: clean_text(&word.text, background, word.continues_without_space),
            duration_ms: end - start,
            is_background: background,
            start_time_ms: Some(start),
        });

        cursor = end;
    }

    out
}

/// Convert a background vocal track.
///
/// The cursor is seeded at the track's own first timestamp rather than the
/// main line's start, so the sequence never opens with a spacer.
#[must_use]
pub fn convert_background(words: &[RawWord], unit: TimeUnit) -> Vec<KaraokeWord> {
    let Some(first) = words.first() else {
        return Vec::new();
    };
    convert_line(words, first.start_ms(unit), true, unit)
}

/// Trim a word, drop redundant background parentheses and restore spacing.
fn clean_text(text: &str, is_background: bool, continues_without_space: bool) -> String {
    let mut cleaned = text.trim();
    if is_background {
        cleaned = cleaned.trim_start_matches('(').trim_end_matches(')');
    }

    if continues_without_space {
        cleaned.to_string()
    } else {
        format!("{cleaned} ")
    }
}
