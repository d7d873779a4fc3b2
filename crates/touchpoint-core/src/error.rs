//! Configuration errors

use thiserror::Error;

/// Raised while building channels or engines from configuration.
///
/// Runtime (per-visit) failures never surface as errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("channel '{id}': malformed matcher: {reason}")]
    MalformedMatcher { id: String, reason: String },

    #[error("channel '{id}': invalid regular expression '{pattern}': {source}")]
    InvalidPattern {
        id: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("channel '{0}': URL matcher needs an extraction key")]
    MissingExtractKey(String),

    #[error("channel id must not be empty")]
    EmptyId,

    #[error("duplicate channel id '{0}'")]
    DuplicateChannel(String),

    #[error("{field} must be positive, got {value}")]
    InvalidDuration { field: &'static str, value: i64 },

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn malformed(id: &str, reason: impl Into<String>) -> Self {
        ConfigError::MalformedMatcher {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
