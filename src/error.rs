//! Library-wide error types.
//!
//! This module provides a unified error hierarchy for the client.
//! The materialization engine uses its own [`MaterializeError`] via
//! `thiserror`, which converts into the top-level [`Error`] for callers.
//!
//! # Design
//!
//! - [`Error`]: top-level client error enum
//! - [`MaterializeError`]: construction failures inside the engine
//! - "Not found" is never an error: endpoints return `Ok(None)` for 404s
//!   and missing payload containers.

/// Client-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level client error.
///
/// Aggregates errors from the HTTP layer and the materialization engine
/// for unified handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network-level failure (connect, TLS, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body could not be parsed
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The configured access token was rejected
    #[error("access token rejected by the service")]
    InvalidToken,

    /// Request rate limited - try again later
    #[error("rate limited - try again later")]
    RateLimited,

    /// Content exists but is not served in the current region,
    /// even through the configured proxy
    #[error("content unavailable in your region")]
    RegionUnavailable,

    /// A follow-up fetch was attempted through a context handle whose
    /// client has been dropped
    #[error("client session is closed")]
    SessionClosed,

    /// Proxy URL rejected at configuration time
    #[error("invalid proxy: {0}")]
    InvalidProxy(String),

    /// Entity construction failure
    #[error(transparent)]
    Materialize(#[from] MaterializeError),
}

impl Error {
    /// Create a network error from any displayable source.
    pub(crate) fn network(err: impl std::fmt::Display) -> Self {
        Self::Network(err.to_string())
    }

    /// Create a parse error from any displayable source.
    pub(crate) fn parse(err: impl std::fmt::Display) -> Self {
        Self::Parse(err.to_string())
    }

    /// Create an API error.
    pub(crate) fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

/// Error raised while turning a raw payload into a typed entity.
///
/// Recoverable payload oddities (missing optional fields, unknown
/// discriminator tags) never surface here; they produce absent fields or
/// skipped elements. Only genuinely malformed payloads fail construction.
#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    /// Neither an explicit id nor a parseable canonical API path was present
    #[error("{kind} payload carries no id and no parseable api_path")]
    MissingIdentity { kind: &'static str },

    /// The payload had a JSON shape the target kind cannot be built from
    #[error("cannot materialize {kind} from a {found} value")]
    UnexpectedPayload {
        kind: &'static str,
        found: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::api(500, "internal error");
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("internal error"));
    }

    #[test]
    fn test_materialize_error_converts() {
        let err: Error = MaterializeError::MissingIdentity { kind: "Track" }.into();
        assert!(err.to_string().contains("Track"));
    }

    #[test]
    fn test_region_unavailable_display() {
        assert!(
            Error::RegionUnavailable
                .to_string()
                .contains("unavailable in your region")
        );
    }
}
