//! Settings error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or checking settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON or does not fit the settings shape.
    #[error("malformed settings in {}: {source}", path.display())]
    Malformed {
        /// File that was being parsed.
        path: PathBuf,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },

    /// The compiled defaults could not be represented as JSON.
    #[error("cannot encode default settings: {0}")]
    Encode(#[from] serde_json::Error),

    /// A value is outside its allowed range.
    #[error("invalid setting {field}: {reason}")]
    Invalid {
        /// camelCase path of the offending field, e.g. `triggers.maxConditionLength`.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl SettingsError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
