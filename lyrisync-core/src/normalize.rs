//! String normalization for fuzzy title/artist matching.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize a title or artist string for comparison.
///
/// Lower-cases, decomposes to NFD and drops combining marks, removes every
/// character that is neither a word character nor whitespace, then collapses
/// runs of whitespace into single spaces and trims. The result is stable
/// under repeated application.
#[must_use]
pub fn normalize(input: &str) -> String {
    let cleaned: String = input
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| is_word_char(*c) || c.is_whitespace())
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
