//! Search provider configuration.

use const_format::concatcp;
use lyrisync_core::{CoreError, ProvidersConfig};
use serde::{Deserialize, Serialize};

/// Provider name used in config file
pub const PROVIDER_NAME: &str = "search";

/// Default timeout for HTTP requests (10 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default number of candidates requested from the search endpoint
pub const DEFAULT_LIMIT: u32 = 5;

/// Search provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchProviderConfig {
    /// Song search endpoint, queried with `?term=...&limit=...`
    pub search_url: String,
    /// Base URL that candidate ids are resolved against
    pub lyrics_url: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl SearchProviderConfig {
    /// Extract search provider config from the dynamic providers config.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be parsed.
    pub fn from_providers(providers: &ProvidersConfig) -> Result<Option<Self>, CoreError> {
        providers.get(PROVIDER_NAME)
    }

    /// Validate that required fields are present.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing or the limit is zero.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.search_url.trim().is_empty() {
            return Err(CoreError::ConfigMissingField {
                field: "providers.search.search_url".into(),
            });
        }
        if self.lyrics_url.trim().is_empty() {
            return Err(CoreError::ConfigMissingField {
                field: "providers.search.lyrics_url".into(),
            });
        }
        if self.limit == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "providers.search.limit must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Config template for the search provider.
/// This is appended to the base config template when creating a new config file.
pub const CONFIG_TEMPLATE: &str = concatcp!(
    r#"[providers.search]
# Required when lyrics.providers contains "search"
search_url = ""
# Candidate ids are appended to this URL to fetch lyrics
lyrics_url = ""
limit = "#,
    DEFAULT_LIMIT,
    "\ntimeout_secs = ",
    DEFAULT_TIMEOUT_SECS,
    "\n"
);
