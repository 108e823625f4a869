//! Index provider configuration.

use const_format::concatcp;
use serde::{Deserialize, Serialize};
use lyrisync_core::{CoreError, ProvidersConfig};

/// Provider name used in config file
pub const PROVIDER_NAME: &str = "index";

/// Default timeout for HTTP requests (10 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Curated-index provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexProviderConfig {
    /// URL of the JSON index of `{ artist, title, path }` entries
    pub index_url: String,
    /// Base URL that index paths are resolved against
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl IndexProviderConfig {
    /// Extract index provider config from the dynamic providers config.
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
    /// Returns an error if required fields are missing or empty.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.index_url.trim().is_empty() {
            return Err(CoreError::ConfigMissingField {
                field: "providers.index.index_url".into(),
            });
        }
        if self.base_url.trim().is_empty() {
            return Err(CoreError::ConfigMissingField {
                field: "providers.index.base_url".into(),
            });
        }
        Ok(())
    }
}

/// Config template for the index provider.
/// This is appended to the base config template when creating a new config file.
pub const CONFIG_TEMPLATE: &str = concatcp!(
    r#"[providers.index]
# Required when lyrics.providers contains "index"
# JSON array of { "artist": ..., "title": ..., "path": ... }
index_url = ""
# Payload paths from the index are resolved against this URL
base_url = ""
timeout_secs = "#,
    DEFAULT_TIMEOUT_SECS,
    "\n"
);

#[cfg(test)]
mod tests {
    use super::*;
    use lyrisync_core::LyrisyncConfig;

    #[test]
    fn test_template_round_trips() {
        let template = lyrisync_core::build_config_template(Some(&[CONFIG_TEMPLATE]));
        let config: LyrisyncConfig = template.parse().unwrap();
        let index = IndexProviderConfig::from_providers(&config.providers)
            .unwrap()
            .unwrap();
        assert_eq!(index.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(matches!(
            index.validate(),
            Err(CoreError::ConfigMissingField { field }) if field == "providers.index.index_url"
        ));
    }

    #[test]
    fn test_valid_config() {
        let config: LyrisyncConfig = r#"
[providers.index]
index_url = "https://lyrics.example.com/index.json"
base_url = "https://lyrics.example.com/songs"
"#
        .parse()
        .unwrap();
        let index = IndexProviderConfig::from_providers(&config.providers)
            .unwrap()
            .unwrap();
        assert!(index.validate().is_ok());
        assert_eq!(index.timeout_secs, 10);
    }
}
