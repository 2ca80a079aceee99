//! Error types for the stookwijzer client.

use thiserror::Error;

/// Result type alias using StookwijzerError.
pub type StookwijzerResult<T> = Result<T, StookwijzerError>;

/// Failure modes of a fetch-and-classify cycle.
///
/// None of these are fatal to the caller: the client reports them and
/// degrades the affected reading to "unknown".
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StookwijzerError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Property {0} not available")]
    PropertyUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl StookwijzerError {
    /// Stable category name, used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            StookwijzerError::Network(_) => "network",
            StookwijzerError::Timeout(_) => "timeout",
            StookwijzerError::MalformedResponse(_) => "malformed_response",
            StookwijzerError::PropertyUnavailable(_) => "property_unavailable",
            StookwijzerError::InvalidConfig(_) => "invalid_config",
        }
    }
}

impl From<serde_json::Error> for StookwijzerError {
    fn from(err: serde_json::Error) -> Self {
        StookwijzerError::MalformedResponse(format!("JSON error: {}", err))
    }
}
