//! Fuzzy matching of a query against a provider's song catalog.

use crate::normalize::normalize;
use crate::provider::LyricsQuery;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Maximum number of search results considered by [`find_candidate`]
pub const SEARCH_CANDIDATE_LIMIT: usize = 5;

/// Entry in a provider's curated lyrics index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub artist: String,
    pub title: String,
    /// Where to fetch the raw payload (path or opaque id)
    pub locator: String,
}

impl IndexEntry {
    pub fn new(
        artist: impl Into<String>,
        title: impl Into<String>,
        locator: impl Into<String>,
    ) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            locator: locator.into(),
        }
    }
}

/// Result of a provider's generic song search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub title: String,
    pub artist: String,
    pub external_id: String,
    pub album: Option<String>,
    pub artwork_url: Option<String>,
}

/// Which rule produced an index match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    Partial,
    TitleFallback,
}

struct Normalized<'a> {
    artist: String,
    title: String,
    entry: &'a IndexEntry,
}

/// `a` contains `b` or `b` contains `a`, with both non-empty
fn mutually_contains(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Find the best index entry for a query.
///
/// Tiers are tried in order and the first entry (in index order) satisfying
/// the current tier wins:
///
/// 1. exact: normalized artist and title both equal
/// 2. partial: artist and title each contained in the other
/// 3. title fallback: entries without an artist match on equal or contained
///    title; entries with an artist need an exactly equal title
#[must_use]
pub fn find_match<'a>(query: &LyricsQuery, index: &'a [IndexEntry]) -> Option<&'a IndexEntry> {
    find_match_with_tier(query, index).map(|(entry, _)| entry)
}

/// Like [`find_match`], also reporting the tier that matched.
#[must_use]
pub fn find_match_with_tier<'a>(
    query: &LyricsQuery,
    index: &'a [IndexEntry],
) -> Option<(&'a IndexEntry, MatchTier)> {
    let artist = normalize(&query.artist);
    let title = normalize(&query.title);

    let entries: Vec<Normalized<'a>> = index
        .iter()
        .map(|entry| Normalized {
            artist: normalize(&entry.artist),
            title: normalize(&entry.title),
            entry,
        })
        .collect();

    let exact = entries
        .iter()
        .find(|e| e.artist == artist && e.title == title);
    if let Some(e) = exact {
        debug!("Exact index match: {} - {}", e.entry.artist, e.entry.title);
        return Some((e.entry, MatchTier::Exact));
    }

    let partial = entries.iter().find(|e| {
        mutually_contains(&e.artist, &artist) && mutually_contains(&e.title, &title)
    });
    if let Some(e) = partial {
        debug!("Partial index match: {} - {}", e.entry.artist, e.entry.title);
        return Some((e.entry, MatchTier::Partial));
    }

    let fallback = entries.iter().find(|e| {
        if e.artist.is_empty() {
            e.title == title || mutually_contains(&e.title, &title)
        } else {
            !title.is_empty() && e.title == title
        }
    });
    if let Some(e) = fallback {
        debug!(
            "Title-fallback index match: {:?} - {}",
            e.entry.artist, e.entry.title
        );
        return Some((e.entry, MatchTier::TitleFallback));
    }

    None
}

/// Pick a search result for a query.
///
/// Among the first [`SEARCH_CANDIDATE_LIMIT`] candidates, prefers one whose
/// normalized title equals the query title and whose normalized artist
/// contains the query artist. Otherwise trusts the provider's ranking and
/// returns the first candidate.
#[must_use]
pub fn find_candidate<'a>(
    query: &LyricsQuery,
    candidates: &'a [SearchCandidate],
) -> Option<&'a SearchCandidate> {
    let artist = normalize(&query.artist);
    let title = normalize(&query.title);
    let considered = &candidates[..candidates.len().min(SEARCH_CANDIDATE_LIMIT)];

    considered
        .iter()
        .find(|c| normalize(&c.title) == title && normalize(&c.artist).contains(&artist))
        .or_else(|| considered.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(title: &str, artist: &str) -> LyricsQuery {
        LyricsQuery::new("spotify:track:test", title, artist)
    }

    fn candidate(title: &str, artist: &str, id: &str) -> SearchCandidate {
        SearchCandidate {
            title: title.to_string(),
            artist: artist.to_string(),
            external_id: id.to_string(),
            album: None,
            artwork_url: None,
        }
    }

    #[test]
    fn test_exact_match() {
        let index = vec![IndexEntry::new("The Beatles", "Yesterday", "beatles/yesterday.json")];
        let (entry, tier) = find_match_with_tier(&query("Yesterday", "The Beatles"), &index).unwrap();
        assert_eq!(entry.locator, "beatles/yesterday.json");
        assert_eq!(tier, MatchTier::Exact);
    }

    #[test]
    fn test_exact_match_ignores_case_and_accents() {
        let index = vec![IndexEntry::new("BEYONCE", "halo", "halo.json")];
        let (_, tier) = find_match_with_tier(&query("Halo", "Beyoncé"), &index).unwrap();
        assert_eq!(tier, MatchTier::Exact);
    }

    #[test]
    fn test_exact_tier_beats_earlier_partial() {
        let index = vec![
            IndexEntry::new("The Beatles", "Yesterday (Remastered 2009)", "partial.json"),
            IndexEntry::new("The Beatles", "Yesterday", "exact.json"),
        ];
        let (entry, tier) = find_match_with_tier(&query("Yesterday", "The Beatles"), &index).unwrap();
        assert_eq!(entry.locator, "exact.json");
        assert_eq!(tier, MatchTier::Exact);
    }

    #[test]
    fn test_partial_match_both_directions() {
        let index = vec![IndexEntry::new("Beatles", "Yesterday - Remastered", "a.json")];
        let (entry, tier) = find_match_with_tier(&query("Yesterday", "The Beatles"), &index).unwrap();
        assert_eq!(entry.locator, "a.json");
        assert_eq!(tier, MatchTier::Partial);
    }

    #[test]
    fn test_partial_requires_non_empty_artist() {
        let index = vec![IndexEntry::new("", "Yesterday Once More", "a.json")];
        // Falls through to title fallback, not partial
        let (_, tier) = find_match_with_tier(&query("Yesterday", "Carpenters"), &index).unwrap();
        assert_eq!(tier, MatchTier::TitleFallback);
    }

    #[test]
    fn test_title_fallback_without_artist() {
        let index = vec![IndexEntry::new("", "Tanpa Cinta", "tanpa-cinta.json")];
        let (entry, tier) = find_match_with_tier(&query("Tanpa Cinta", "Anyone At All"), &index).unwrap();
        assert_eq!(entry.locator, "tanpa-cinta.json");
        assert_eq!(tier, MatchTier::TitleFallback);
    }

    #[test]
    fn test_title_fallback_with_misattributed_artist_needs_exact_title() {
        let index = vec![
            IndexEntry::new("Somebody Else", "Tanpa Cinta Lagi", "contained.json"),
            IndexEntry::new("Somebody Else", "Tanpa Cinta", "exact.json"),
        ];
        let entry = find_match(&query("Tanpa Cinta", "Yovie"), &index).unwrap();
        assert_eq!(entry.locator, "exact.json");
    }

    #[test]
    fn test_no_match() {
        let index = vec![
            IndexEntry::new("Queen", "Bohemian Rhapsody", "a.json"),
            IndexEntry::new("", "Let It Be", "b.json"),
        ];
        assert!(find_match(&query("Yesterday", "The Beatles"), &index).is_none());
        assert!(find_match(&query("Yesterday", "The Beatles"), &[]).is_none());
    }

    #[test]
    fn test_first_entry_wins_within_tier() {
        let index = vec![
            IndexEntry::new("The Beatles", "Yesterday", "first.json"),
            IndexEntry::new("the beatles", "yesterday", "second.json"),
        ];
        let entry = find_match(&query("Yesterday", "The Beatles"), &index).unwrap();
        assert_eq!(entry.locator, "first.json");
    }

    #[test]
    fn test_candidate_prefers_title_and_artist() {
        let candidates = vec![
            candidate("Yesterday (Live)", "The Beatles", "1"),
            candidate("Yesterday", "Boyz II Men", "2"),
            candidate("Yesterday", "The Beatles & Friends", "3"),
        ];
        let chosen = find_candidate(&query("Yesterday", "The Beatles"), &candidates).unwrap();
        assert_eq!(chosen.external_id, "3");
    }

    #[test]
    fn test_candidate_falls_back_to_first() {
        let candidates = vec![
            candidate("Something Else", "Nobody", "1"),
            candidate("Other", "Someone", "2"),
        ];
        let chosen = find_candidate(&query("Yesterday", "The Beatles"), &candidates).unwrap();
        assert_eq!(chosen.external_id, "1");
    }

    #[test]
    fn test_candidate_only_considers_limit() {
        let mut candidates: Vec<_> = (0..SEARCH_CANDIDATE_LIMIT)
            .map(|i| candidate("Filler", "Nobody", &i.to_string()))
            .collect();
        candidates.push(candidate("Yesterday", "The Beatles", "late"));
        let chosen = find_candidate(&query("Yesterday", "The Beatles"), &candidates).unwrap();
        assert_eq!(chosen.external_id, "0");
    }

    #[test]
    fn test_candidate_empty() {
        assert!(find_candidate(&query("Yesterday", "The Beatles"), &[]).is_none());
    }
}
