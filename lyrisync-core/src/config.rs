use crate::error::{CoreError, Result};
use crate::paths::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use const_format::concatcp;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LyrisyncConfig {
    #[serde(default)]
    pub lyrics: LyricsConfig,
    /// Provider-specific sections, e.g. `[providers.index]`
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LyricsConfig {
    /// Provider priority: providers are tried in order
    #[serde(default = "default_providers")]
    pub providers: Vec<LyricsProviderType>,
}

fn default_providers() -> Vec<LyricsProviderType> {
    vec![LyricsProviderType::Index, LyricsProviderType::Search]
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            providers: default_providers(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LyricsProviderType {
    Index,
    Search,
}

impl LyricsProviderType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Search => "search",
        }
    }
}

impl std::fmt::Display for LyricsProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dynamic per-provider configuration.
///
/// Each provider crate owns the typed shape of its own section and pulls it
/// out with [`ProvidersConfig::get`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProvidersConfig(toml::Table);

impl ProvidersConfig {
    /// Deserialize the section for `name`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the section exists but does not match `T`.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        self.0
            .get(name)
            .map(|value| value.clone().try_into::<T>())
            .transpose()
            .map_err(CoreError::from)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write logs to a file under the cache directory
    #[serde(default)]
    pub enabled: bool,
}

impl LyrisyncConfig {
    /// Get the config file path (~/.config/lyrisync/config.toml)
    #[must_use]
    pub fn config_path() -> PathBuf {
        crate::paths::config_path()
    }

    /// Load config from the default path or create a template on first run.
    ///
    /// `provider_templates` are appended to the base template when a new file
    /// is written.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfigNotFound`] after writing a fresh template, or
    /// an error if the file cannot be read, parsed or validated.
    pub fn load_or_create(provider_templates: Option<&[&str]>) -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            // Create config directory if it doesn't exist
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::write(&config_path, build_config_template(provider_templates))?;

            return Err(CoreError::ConfigNotFound { path: config_path });
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        content.parse()
    }

    /// Validate cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if no providers are configured.
    pub fn validate(&self) -> Result<()> {
        if self.lyrics.providers.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "lyrics.providers must list at least one provider".into(),
            });
        }
        Ok(())
    }
}

impl std::str::FromStr for LyrisyncConfig {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

/// Build a complete config template from the base template and provider
/// fragments.
#[must_use]
pub fn build_config_template(provider_templates: Option<&[&str]>) -> String {
    let mut template = String::from(CONFIG_TEMPLATE);
    for fragment in provider_templates.unwrap_or_default() {
        template.push('\n');
        template.push_str(fragment);
    }
    template
}

const CONFIG_TEMPLATE: &str = concatcp!(
    "# Lyrisync Configuration\n# ~/.config/",
    CONFIG_DIR_NAME,
    "/",
    CONFIG_FILE_NAME,
    r#"

[lyrics]
# Provider priority: "index", "search"
# Providers are tried in order; first successful result wins
providers = ["index", "search"]

[logging]
# Also write logs to ~/.cache/lyrisync/lyrisync.log
enabled = false
"#
);
