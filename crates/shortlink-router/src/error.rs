//! Error types for routing.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Router-specific errors.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Invalid path pattern passed to a registration call.
    #[error("invalid path pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl RouterError {
    pub(crate) fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;

/// A failure raised by a route handler.
///
/// Any error type converts into this with `?`. The dispatcher turns it into
/// a generic 500 response and logs the cause; it never reaches the client.
pub struct HandlerError {
    inner: Box<dyn StdError + Send + Sync + 'static>,
}

impl HandlerError {
    /// Wraps an arbitrary error or message.
    pub fn new(err: impl Into<Box<dyn StdError + Send + Sync + 'static>>) -> Self {
        Self { inner: err.into() }
    }
}

impl<E> From<E> for HandlerError
where
    E: StdError + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        Self {
            inner: Box::new(err),
        }
    }
}

impl fmt::Debug for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HandlerError").field(&self.inner).finish()
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

/// Result type returned by route handlers.
pub type HandlerResult = std::result::Result<crate::Response, HandlerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pattern_message() {
        let err = RouterError::invalid_pattern("/a/:", "empty parameter name");
        assert_eq!(
            err.to_string(),
            "invalid path pattern \"/a/:\": empty parameter name"
        );
    }

    #[test]
    fn test_handler_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err: HandlerError = io.into();
        assert_eq!(err.to_string(), "disk on fire");
    }

    #[test]
    fn test_handler_error_from_str() {
        let err = HandlerError::new("boom");
        assert_eq!(err.to_string(), "boom");
        assert!(format!("{err:?}").starts_with("HandlerError"));
    }
}
