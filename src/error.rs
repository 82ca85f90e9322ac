//! Error taxonomy shared by the parameter store, the service layer and the
//! HTTP handlers.

use thiserror::Error;

/// Error kinds that callers match on.
///
/// `Internal` is opaque: it carries a message for logging and is never
/// matched by content.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// The entity or request-scope key is absent.
    #[error("not found")]
    NotFound,

    /// An update candidate equals the stored state.
    #[error("not modified")]
    NotModified,

    /// Malformed input that failed shape validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Internal(String),
}

impl Error {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Result type for parameter, repository and service operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_keeps_message() {
        let err = Error::internal("disk on fire");
        assert_eq!(err.to_string(), "disk on fire");
    }

    #[test]
    fn test_invalid_argument_message() {
        let err = Error::invalid_argument("ids must not be empty");
        assert_eq!(err.to_string(), "invalid argument: ids must not be empty");
    }
}
