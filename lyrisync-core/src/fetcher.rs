//! Lyrics fetcher that tries multiple lyrics providers in priority order.

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::provider::{ErrorKind, LyricsProvider, LyricsQuery, LyricsResult};

/// Provider name reported when no providers are configured
const NO_PROVIDER: &str = "none";

/// Tries each provider in order until one returns lyrics
pub struct LyricsFetcher {
    providers: Vec<Box<dyn LyricsProvider>>,
}

impl LyricsFetcher {
    /// Create a new lyrics fetcher
    ///
    /// # Arguments
    /// * `providers` - List of lyrics providers to try in order
    #[must_use]
    pub fn new(providers: Vec<Box<dyn LyricsProvider>>) -> Self {
        Self { providers }
    }

    /// Names of the configured providers, in priority order
    #[must_use]
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Find lyrics for a query.
    ///
    /// Returns the first successful result. When every provider fails, a
    /// concrete failure (network, format, empty) is preferred over
    /// `NotFound`, since it says more about why nothing came back.
    pub async fn find(&self, query: &LyricsQuery) -> LyricsResult {
        info!(
            "Fetching lyrics for: {} - {} (providers: {:?})",
            query.artist,
            query.title,
            self.provider_names()
        );

        let mut first_failure: Option<LyricsResult> = None;
        let mut last_not_found: Option<LyricsResult> = None;

        for provider in &self.providers {
            info!("Trying provider: {}", provider.name());
            let result = provider.find_lyrics(query).await;
            let outcome = result.error;

            match outcome {
                None => {
                    info!("Found lyrics from {}", provider.name());
                    return result;
                }
                Some(ErrorKind::NotFound) => {
                    info!("Provider {} returned no lyrics", provider.name());
                    last_not_found = Some(result);
                }
                Some(kind) => {
                    info!("Provider {} failed: {kind}", provider.name());
                    if first_failure.is_none() {
                        first_failure = Some(result);
                    }
                }
            }
        }

        info!(
            "No lyrics found for {} - {} (tried {} providers)",
            query.artist,
            query.title,
            self.providers.len()
        );

        first_failure.or(last_not_found).unwrap_or_else(|| {
            LyricsResult::failure(&query.uri, NO_PROVIDER, ErrorKind::NotFound)
        })
    }

    /// Find lyrics unless `cancel_token` fires first.
    ///
    /// Returns `None` when cancelled. In-flight provider work is dropped; the
    /// only shared state (index caches) is replaced whole, so nothing is
    /// left half-written.
    pub async fn find_until_cancelled(
        &self,
        query: &LyricsQuery,
        cancel_token: &CancellationToken,
    ) -> Option<LyricsResult> {
        tokio::select! {
            () = cancel_token.cancelled() => {
                info!("Lyrics lookup for {} cancelled", query.uri);
                None
            }
            result = self.find(query) => Some(result),
        }
    }
}
