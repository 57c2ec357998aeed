//! Error types for authentication.

use shortlink_store::StoreError;
use thiserror::Error;

/// Authentication-specific errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Session storage failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The callback `state` did not match the one issued at sign-in.
    #[error("OAuth state mismatch")]
    StateMismatch,

    /// The callback carried no authorization code.
    #[error("missing authorization code")]
    MissingCode,

    /// The identity provider refused the code exchange.
    #[error("token exchange failed: {0}")]
    Exchange(String),

    /// Transport error talking to the identity provider.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AuthError {
    /// Returns true if the error was caused by a malformed callback request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::StateMismatch | Self::MissingCode)
    }
}

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;
