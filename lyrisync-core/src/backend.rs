//! Fetch-layer seam consumed by [`ProviderFacade`](crate::ProviderFacade).
//!
//! A backend knows how to reach one provider: where its index lives, how to
//! search it and how to parse its payload shape into [`RawLyrics`]. It does
//! no matching, conversion or error folding; the facade owns those.

use crate::error::Result;
use crate::matcher::{IndexEntry, SearchCandidate};
use crate::raw::RawLyrics;
use async_trait::async_trait;

#[async_trait]
pub trait LyricsBackend: Send + Sync {
    /// Provider name reported in results
    fn name(&self) -> &'static str;

    /// Fetch the provider's curated index.
    ///
    /// Returns `Ok(None)` when the provider has no curated index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be fetched or decoded.
    async fn fetch_index(&self) -> Result<Option<Vec<IndexEntry>>>;

    /// Run the provider's generic song search.
    ///
    /// Providers without a search endpoint return no candidates.
    ///
    /// # Errors
    ///
    /// Returns an error if the search request fails.
    async fn search_candidates(&self, term: &str) -> Result<Vec<SearchCandidate>> {
        let _ = term;
        Ok(Vec::new())
    }

    /// Fetch and parse the payload behind a locator.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidFormat`](crate::CoreError::InvalidFormat)
    /// when the payload does not match the provider's shape, or a transport
    /// error when the fetch fails.
    async fn fetch_lyrics(&self, locator: &str) -> Result<RawLyrics>;
}
