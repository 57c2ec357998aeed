//! Error types for the application.

use shortlink_router::RouterError;
use shortlink_store::StoreError;
use thiserror::Error;

/// Errors raised while starting or running the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// A route pattern failed to compile.
    #[error("router error: {0}")]
    Router(#[from] RouterError),

    /// The store could not be opened.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
