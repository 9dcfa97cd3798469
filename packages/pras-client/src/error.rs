//! Error types for the PRAS client.

use thiserror::Error;

/// Result type for PRAS client operations.
pub type Result<T> = std::result::Result<T, PrasError>;

/// PRAS client errors.
#[derive(Debug, Error)]
pub enum PrasError {
    /// Network error (connection failed, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the registry
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not an organisation structure document
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
