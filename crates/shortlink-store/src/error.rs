//! Error types for the store.

use thiserror::Error;

/// Store-specific errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The URL to shorten is not a valid absolute URL.
    #[error("invalid URL provided: {0}")]
    InvalidUrl(String),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
