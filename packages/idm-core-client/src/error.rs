//! Error types for the IdM core client.

use thiserror::Error;

/// Result type for IdM core client operations.
pub type Result<T> = std::result::Result<T, IdmCoreError>;

/// IdM core client errors.
#[derive(Debug, Error)]
pub enum IdmCoreError {
    /// Network error (connection failed, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the API
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Unexpected response format
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A URL could not be built from the configured base
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
