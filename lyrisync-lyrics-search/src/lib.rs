pub mod config;
pub mod payload;

pub use config::SearchProviderConfig;

use async_trait::async_trait;
use lyrisync_core::{CoreError, IndexEntry, LyricsBackend, ProviderFacade, RawLyrics, SearchCandidate};
use std::time::Duration;
use tracing::{info, warn};

/// Search-based lyrics provider, ready to hand to a
/// [`LyricsFetcher`](lyrisync_core::LyricsFetcher)
pub type SearchLyricsProvider = ProviderFacade<SearchProvider>;

/// Backend for a provider with a generic song search and a lyrics endpoint
/// keyed by search result id
pub struct SearchProvider {
    client: reqwest::Client,
    search_url: String,
    lyrics_url: String,
    limit: u32,
}

impl SearchProvider {
    /// Create a new search backend from its config section.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is incomplete or the HTTP client
    /// cannot be created.
    pub fn new(config: &SearchProviderConfig) -> Result<Self, CoreError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("Lyrisync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            search_url: config.search_url.clone(),
            lyrics_url: config.lyrics_url.trim_end_matches('/').to_string(),
            limit: config.limit,
        })
    }

    /// Wrap this backend in the matching and conversion facade
    #[must_use]
    pub fn into_provider(self) -> SearchLyricsProvider {
        ProviderFacade::new(self)
    }

    fn search_request_url(&self, term: &str) -> String {
        let separator = if self.search_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}term={}&limit={}",
            self.search_url,
            urlencoding::encode(term),
            self.limit
        )
    }

    fn lyrics_request_url(&self, id: &str) -> String {
        format!("{}/{}", self.lyrics_url, urlencoding::encode(id))
    }

    async fn get_text(&self, url: &str) -> Result<String, CoreError> {
        let response = self.client.get(url).send().await?;
        info!("Search provider response status: {}", response.status());

        if !response.status().is_success() {
            warn!("Search provider returned status {} for {url}", response.status());
            return Err(CoreError::HttpStatus {
                provider: config::PROVIDER_NAME.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl LyricsBackend for SearchProvider {
    fn name(&self) -> &'static str {
        config::PROVIDER_NAME
    }

    /// This provider has no curated index
    async fn fetch_index(&self) -> Result<Option<Vec<IndexEntry>>, CoreError> {
        Ok(None)
    }

    async fn search_candidates(&self, term: &str) -> Result<Vec<SearchCandidate>, CoreError> {
        let url = self.search_request_url(term);
        info!("Search provider GET (search): {url}");
        let body = self.get_text(&url).await?;
        let candidates = payload::parse_search(&body)?;
        info!("Search provider returned {} candidates", candidates.len());
        Ok(candidates)
    }

    async fn fetch_lyrics(&self, locator: &str) -> Result<RawLyrics, CoreError> {
        let url = self.lyrics_request_url(locator);
        info!("Search provider GET (lyrics): {url}");
        let body = self.get_text(&url).await?;
        payload::parse_payload(&body)
    }
}
