pub mod config;
pub mod payload;

pub use config::IndexProviderConfig;

use async_trait::async_trait;
use lyrisync_core::{CoreError, IndexEntry, LyricsBackend, ProviderFacade, RawLyrics};
use std::time::Duration;
use tracing::{info, warn};

/// Curated-index lyrics provider, ready to hand to a
/// [`LyricsFetcher`](lyrisync_core::LyricsFetcher)
pub type IndexLyricsProvider = ProviderFacade<IndexProvider>;

/// Backend for a provider that publishes a curated JSON index and serves one
/// word-timed payload per indexed song
pub struct IndexProvider {
    client: reqwest::Client,
    index_url: String,
    base_url: String,
}

impl IndexProvider {
    /// Create a new index backend from its config section.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is incomplete or the HTTP client
    /// cannot be created.
    pub fn new(config: &IndexProviderConfig) -> Result<Self, CoreError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("Lyrisync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            index_url: config.index_url.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Wrap this backend in the matching and conversion facade
    #[must_use]
    pub fn into_provider(self) -> IndexLyricsProvider {
        ProviderFacade::new(self)
    }

    /// URL of the payload behind an index path
    fn payload_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_text(&self, url: &str) -> Result<String, CoreError> {
        let response = self.client.get(url).send().await?;
        info!("Index provider response status: {}", response.status());

        if !response.status().is_success() {
            warn!("Index provider returned status {} for {url}", response.status());
            return Err(CoreError::HttpStatus {
                provider: config::PROVIDER_NAME.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl LyricsBackend for IndexProvider {
    fn name(&self) -> &'static str {
        config::PROVIDER_NAME
    }

    async fn fetch_index(&self) -> Result<Option<Vec<IndexEntry>>, CoreError> {
        info!("Index provider GET (index): {}", self.index_url);
        let body = self.get_text(&self.index_url).await?;
        let entries = payload::parse_index(&body)?;
        info!("Index provider loaded {} entries", entries.len());
        Ok(Some(entries))
    }

    async fn fetch_lyrics(&self, locator: &str) -> Result<RawLyrics, CoreError> {
        let url = self.payload_url(locator);
        info!("Index provider GET (payload): {url}");
        let body = self.get_text(&url).await?;
        payload::parse_payload(&body)
    }
}
