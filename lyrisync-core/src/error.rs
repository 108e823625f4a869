use crate::provider::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // Configuration errors
    #[error("Config file not found at {path}. A template has been created - please edit it and restart.")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid config: {message}")]
    ConfigInvalid { message: String },

    #[error("Missing required config field: {field}")]
    ConfigMissingField { field: String },

    #[error("Failed to parse config file: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    // Lyrics errors
    #[error("Lyrics provider {provider} returned status {status}")]
    HttpStatus { provider: String, status: u16 },

    #[error("Lyrics payload has an invalid format: {reason}")]
    InvalidFormat { reason: String },

    #[error("Failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    // Network errors
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Shorthand for an [`CoreError::InvalidFormat`] error.
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            reason: reason.into(),
        }
    }

    /// Map this error onto the kind surfaced in a lyrics result.
    ///
    /// A response body that fails to decode is a format problem, not a
    /// transport one, even when `reqwest` reports it.
    #[must_use]
    pub fn error_kind(&self) -> ErrorKind {
        match self {
            Self::Network(e) if e.is_decode() => ErrorKind::InvalidFormat,
            Self::InvalidFormat { .. } | Self::Json(_) => ErrorKind::InvalidFormat,
            _ => ErrorKind::NetworkError,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_format_maps_to_invalid_format() {
        let err = CoreError::invalid_format("missing content");
        assert_eq!(err.error_kind(), ErrorKind::InvalidFormat);
        assert_eq!(
            err.to_string(),
            "Lyrics payload has an invalid format: missing content"
        );
    }

    #[test]
    fn test_json_error_maps_to_invalid_format() {
        let err: CoreError = serde_json::from_str::<serde_json::Value>("{")
            .map_err(CoreError::from)
            .unwrap_err();
        assert_eq!(err.error_kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_http_status_maps_to_network_error() {
        let err = CoreError::HttpStatus {
            provider: "index".to_string(),
            status: 503,
        };
        assert_eq!(err.error_kind(), ErrorKind::NetworkError);
    }

    #[test]
    fn test_io_error_maps_to_network_error() {
        let err = CoreError::from(std::io::Error::other("boom"));
        assert_eq!(err.error_kind(), ErrorKind::NetworkError);
    }
}
