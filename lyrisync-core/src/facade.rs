//! Match, fetch, convert and aggregate behind one infallible call.

use crate::aggregate::aggregate;
use crate::backend::LyricsBackend;
use crate::cache::IndexCache;
use crate::error::{CoreError, Result};
use crate::lyrics::UnsyncedLine;
use crate::matcher::{find_candidate, find_match};
use crate::provider::{ErrorKind, LyricsProvider, LyricsQuery, LyricsResult};
use crate::raw::RawLyrics;
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// A [`LyricsProvider`] built on top of a [`LyricsBackend`].
///
/// Owns the backend's index cache, so sharing one facade (for example behind
/// an `Arc`) shares the cache between lookups.
pub struct ProviderFacade<B> {
    backend: B,
    index_cache: IndexCache,
}

impl<B: LyricsBackend> ProviderFacade<B> {
    /// Create a facade with a fresh index cache using the default TTL
    pub fn new(backend: B) -> Self {
        Self::with_cache(backend, IndexCache::new())
    }

    /// Create a facade with a caller-provided index cache
    pub const fn with_cache(backend: B, index_cache: IndexCache) -> Self {
        Self {
            backend,
            index_cache,
        }
    }

    /// Get the underlying backend
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Get the index cache
    pub const fn index_cache(&self) -> &IndexCache {
        &self.index_cache
    }

    /// Resolve a query to a payload locator: curated index first, then search.
    async fn locate(&self, query: &LyricsQuery) -> Result<Option<String>> {
        let index = self
            .index_cache
            .get_or_refresh(|| async {
                let entries = self.backend.fetch_index().await?;
                Ok::<_, CoreError>(entries.unwrap_or_default())
            })
            .await?;

        if let Some(entry) = find_match(query, &index) {
            info!(
                "{} index matched {} - {} ({})",
                self.backend.name(),
                entry.artist,
                entry.title,
                entry.locator
            );
            return Ok(Some(entry.locator.clone()));
        }

        debug!(
            "{} index has no match among {} entries, trying search",
            self.backend.name(),
            index.len()
        );

        let candidates = self.backend.search_candidates(&query.search_term()).await?;
        Ok(find_candidate(query, &candidates).map(|candidate| {
            info!(
                "{} search matched {} - {} ({})",
                self.backend.name(),
                candidate.artist,
                candidate.title,
                candidate.external_id
            );
            candidate.external_id.clone()
        }))
    }

    async fn lookup(&self, query: &LyricsQuery) -> Result<LyricsResult> {
        let Some(locator) = self.locate(query).await? else {
            info!(
                "{} found no match for {} - {}",
                self.backend.name(),
                query.artist,
                query.title
            );
            return Ok(LyricsResult::failure(
                &query.uri,
                self.backend.name(),
                ErrorKind::NotFound,
            ));
        };

        let raw = self.backend.fetch_lyrics(&locator).await?;
        Ok(build_result(query, self.backend.name(), raw))
    }
}

/// Turn parsed raw lyrics into a result.
///
/// Uses the provider's own plain-text form for `unsynced` when present and
/// non-empty, otherwise the text derived from the timed lines.
#[must_use]
pub fn build_result(query: &LyricsQuery, provider: &str, raw: RawLyrics) -> LyricsResult {
    let aggregated = aggregate(&raw);

    let unsynced = raw
        .plain_lines
        .map(|lines| {
            lines
                .into_iter()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .map(|text| UnsyncedLine { text })
                .collect::<Vec<_>>()
        })
        .filter(|lines| !lines.is_empty())
        .unwrap_or(aggregated.unsynced);

    let karaoke = aggregated.karaoke;
    let synced = aggregated.synced;

    if karaoke.is_empty() && synced.is_empty() && unsynced.is_empty() {
        info!("{provider} payload for {} has no usable lines", query.uri);
        return LyricsResult::failure(&query.uri, provider, ErrorKind::EmptyLyrics);
    }

    info!(
        "{provider} returned {} karaoke cues, {} synced lines, {} unsynced lines",
        karaoke.len(),
        synced.len(),
        unsynced.len()
    );

    LyricsResult {
        uri: query.uri.clone(),
        provider: provider.to_string(),
        karaoke: (!karaoke.is_empty()).then_some(karaoke),
        synced: (!synced.is_empty()).then_some(synced),
        unsynced: (!unsynced.is_empty()).then_some(unsynced),
        copyright: raw.copyright,
        error: None,
    }
}

#[async_trait]
impl<B: LyricsBackend> LyricsProvider for ProviderFacade<B> {
    fn name(&self) -> &'static str {
        self.backend.name()
    }

    async fn find_lyrics(&self, query: &LyricsQuery) -> LyricsResult {
        if !query.is_valid() {
            warn!("Rejecting lyrics query without title or artist: {:?}", query);
            return LyricsResult::failure(&query.uri, self.name(), ErrorKind::NotFound);
        }

        info!(
            "Looking up lyrics on {} for: {} - {}",
            self.name(),
            query.artist,
            query.title
        );

        match self.lookup(query).await {
            Ok(result) => result,
            Err(e) => {
                let kind = e.error_kind();
                warn!("Provider {} failed ({kind}): {e}", self.name());
                LyricsResult::failure(&query.uri, self.name(), kind)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{IndexEntry, SearchCandidate};
    use crate::raw::{RawLine, RawWord};
    use crate::time::TimeUnit;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeBackend {
        index: Option<Vec<IndexEntry>>,
        candidates: Vec<SearchCandidate>,
        payloads: HashMap<String, RawLyrics>,
        index_fails: bool,
        payload_invalid: bool,
        index_calls: AtomicUsize,
        searches: AtomicUsize,
    }

    #[async_trait]
    impl LyricsBackend for FakeBackend {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn fetch_index(&self) -> Result<Option<Vec<IndexEntry>>> {
            self.index_calls.fetch_add(1, Ordering::SeqCst);
            if self.index_fails {
                return Err(CoreError::HttpStatus {
                    provider: "fake".to_string(),
                    status: 502,
                });
            }
            Ok(self.index.clone())
        }

        async fn search_candidates(&self, _term: &str) -> Result<Vec<SearchCandidate>> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            Ok(self.candidates.clone())
        }

        async fn fetch_lyrics(&self, locator: &str) -> Result<RawLyrics> {
            if self.payload_invalid {
                return Err(CoreError::invalid_format("missing content"));
            }
            self.payloads
                .get(locator)
                .cloned()
                .ok_or_else(|| CoreError::HttpStatus {
                    provider: "fake".to_string(),
                    status: 404,
                })
        }
    }

    fn yesterday() -> LyricsQuery {
        LyricsQuery::new("spotify:track:yesterday", "Yesterday", "The Beatles")
    }

    fn payload() -> RawLyrics {
        RawLyrics::new(
            TimeUnit::Milliseconds,
            vec![RawLine {
                start: 0.0,
                end: 800.0,
                words: vec![RawWord::new("Hey", 0.0, 300.0), RawWord::new("you", 500.0, 800.0)],
                ..RawLine::default()
            }],
        )
    }

    fn backend_with_index() -> FakeBackend {
        FakeBackend {
            index: Some(vec![IndexEntry::new("The Beatles", "Yesterday", "beatles/yesterday")]),
            payloads: HashMap::from([("beatles/yesterday".to_string(), payload())]),
            ..FakeBackend::default()
        }
    }

    #[tokio::test]
    async fn test_index_match_builds_all_forms() {
        let facade = ProviderFacade::new(backend_with_index());
        let result = facade.find_lyrics(&yesterday()).await;

        assert!(result.is_found());
        assert_eq!(result.uri, "spotify:track:yesterday");
        assert_eq!(result.provider, "fake");

        let karaoke = result.karaoke.as_ref().unwrap();
        let words: Vec<_> = karaoke[0]
            .words
            .iter()
            .map(|w| (w.text.trim_end(), w.duration_ms))
            .collect();
        assert_eq!(words, vec![("Hey", 300), ("", 200), ("you", 300)]);

        assert_eq!(result.synced.as_ref().unwrap()[0].text, "Hey you");
        assert_eq!(result.unsynced.as_ref().unwrap()[0].text, "Hey you");
        assert_eq!(facade.backend().searches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_index_is_cached_between_lookups() {
        let facade = ProviderFacade::new(backend_with_index());
        facade.find_lyrics(&yesterday()).await;
        facade.find_lyrics(&yesterday()).await;
        assert_eq!(facade.backend().index_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_search_fallback() {
        let backend = FakeBackend {
            candidates: vec![SearchCandidate {
                title: "Yesterday".to_string(),
                artist: "The Beatles".to_string(),
                external_id: "42".to_string(),
                album: Some("Help!".to_string()),
                artwork_url: None,
            }],
            payloads: HashMap::from([("42".to_string(), payload())]),
            ..FakeBackend::default()
        };
        let facade = ProviderFacade::new(backend);
        let result = facade.find_lyrics(&yesterday()).await;
        assert!(result.is_found());
        assert_eq!(facade.backend().searches.load(Ordering::SeqCst), 1);

        // The missing index is cached as empty and not refetched
        let again = facade.find_lyrics(&yesterday()).await;
        assert!(again.is_found());
        assert_eq!(facade.backend().index_calls.load(Ordering::SeqCst), 1);
        assert_eq!(facade.backend().searches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_not_found_when_nothing_matches() {
        let facade = ProviderFacade::new(FakeBackend::default());
        let result = facade.find_lyrics(&yesterday()).await;
        assert_eq!(result, LyricsResult::failure("spotify:track:yesterday", "fake", ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_invalid_query_skips_backend() {
        let facade = ProviderFacade::new(backend_with_index());
        let result = facade
            .find_lyrics(&LyricsQuery::new("uri", "", "The Beatles"))
            .await;
        assert_eq!(result.error, Some(ErrorKind::NotFound));
        assert_eq!(facade.backend().index_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_payload_is_empty_lyrics() {
        let mut backend = backend_with_index();
        backend.payloads.insert(
            "beatles/yesterday".to_string(),
            RawLyrics::new(TimeUnit::Seconds, vec![]),
        );
        let result = ProviderFacade::new(backend).find_lyrics(&yesterday()).await;
        assert_eq!(result.error, Some(ErrorKind::EmptyLyrics));
        assert!(result.karaoke.is_none());
        assert!(result.synced.is_none());
        assert!(result.unsynced.is_none());
    }

    #[tokio::test]
    async fn test_invalid_payload_is_invalid_format() {
        let mut backend = backend_with_index();
        backend.payload_invalid = true;
        let result = ProviderFacade::new(backend).find_lyrics(&yesterday()).await;
        assert_eq!(result.error, Some(ErrorKind::InvalidFormat));
    }

    #[tokio::test]
    async fn test_index_failure_is_network_error() {
        let mut backend = backend_with_index();
        backend.index_fails = true;
        let result = ProviderFacade::new(backend).find_lyrics(&yesterday()).await;
        assert_eq!(result.error, Some(ErrorKind::NetworkError));
        assert!(result.synced.is_none());
    }

    #[test]
    fn test_provider_plain_text_wins_over_derived() {
        let mut raw = payload();
        raw.plain_lines = Some(vec!["Hey you".to_string(), "  ".to_string(), "Out there".to_string()]);
        raw.copyright = Some("(c) Somebody".to_string());
        let result = build_result(&yesterday(), "fake", raw);

        let unsynced: Vec<_> = result
            .unsynced
            .as_ref()
            .unwrap()
            .iter()
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(unsynced, vec!["Hey you", "Out there"]);
        assert_eq!(result.copyright.as_deref(), Some("(c) Somebody"));
    }

    #[test]
    fn test_blank_provider_plain_text_falls_back_to_synced() {
        let mut raw = payload();
        raw.plain_lines = Some(vec![String::new()]);
        let result = build_result(&yesterday(), "fake", raw);
        assert_eq!(result.unsynced.as_ref().unwrap()[0].text, "Hey you");
    }

    #[test]
    fn test_textless_lines_leave_unsynced_empty() {
        let raw = RawLyrics::new(
            TimeUnit::Milliseconds,
            vec![RawLine {
                start: 0.0,
                end: 500.0,
                words: vec![RawWord::new("♪", 0.0, 500.0)],
                ..RawLine::default()
            }],
        );
        let result = build_result(&yesterday(), "fake", raw);
        assert!(result.is_found());
        assert!(result.karaoke.is_some());
        assert!(result.unsynced.is_none());
    }
}
