//! Common error types for the catalog engine

use thiserror::Error;

/// Common result type for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by catalog, search, and audio resolution operations
#[derive(Error, Debug)]
pub enum Error {
    /// Non-success HTTP response for a fetched document or sample
    #[error("Fetch failed: {url} returned status {status}")]
    Fetch { url: String, status: u16 },

    /// Transport-level network failure (connection, timeout, body read)
    #[error("Network error: {0}")]
    Network(String),

    /// Library or preset name could not be resolved after all fallback rules
    #[error("Not found: {0}")]
    NotFound(String),

    /// Audio reference is missing required fields
    #[error("Invalid audio reference: {0}")]
    InvalidReference(String),

    /// The audio decode capability rejected the bytes
    #[error("Decode error: {0}")]
    Decode(String),

    /// Fetched document was not valid JSON for the expected shape
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
