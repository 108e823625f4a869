//! Timestamp unit handling.
//!
//! Providers report timestamps either in seconds or in milliseconds. Raw
//! values stay in the provider's unit until the word timing converter asks
//! for milliseconds, so no arithmetic ever mixes units.

use serde::{Deserialize, Serialize};

/// Unit of the raw timestamps in a provider payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Seconds,
    Milliseconds,
}

impl TimeUnit {
    /// Convert a raw timestamp to whole milliseconds.
    ///
    /// Rounds to the nearest millisecond. Negative, NaN and infinite inputs
    /// clamp to 0; values beyond `u64::MAX` milliseconds saturate.
    #[must_use]
    pub fn to_millis(self, value: f64) -> u64 {
        let millis = match self {
            Self::Seconds => value * 1000.0,
            Self::Milliseconds => value,
        };

        if !millis.is_finite() || millis <= 0.0 {
            return 0;
        }

        let rounded = millis.round();
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        if rounded >= u64::MAX as f64 {
            u64::MAX
        } else {
            rounded as u64
        }
    }
}
