//! Gateway error types.
//!
//! Every fatal error aborts the whole query: there is no partial-success
//! response. An under-filled page (fewer hits than the page size because
//! the source or the latency budget ran out) is a success, not an error.

use searchgate_protocol::CursorError;
use thiserror::Error;

/// Errors surfaced by the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Invalid gateway configuration. Raised at construction, never at
    /// query time.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// The underlying engine fetch failed. Fatal for the current query;
    /// never retried by the gateway.
    #[error("upstream query failed: {message}")]
    UpstreamQuery { message: String },

    /// The authorizer call failed. Fatal for the current query; no hit is
    /// assumed allowed or denied without an explicit decision.
    #[error("authorization failed: {message}")]
    Authorization { message: String },

    /// The incoming page cursor is malformed.
    #[error("invalid page cursor: {token}")]
    InvalidCursor { token: String },
}

impl GatewayError {
    /// Create an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create an upstream query error.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamQuery {
            message: message.into(),
        }
    }

    /// Create an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }
}

impl From<CursorError> for GatewayError {
    fn from(err: CursorError) -> Self {
        match err {
            CursorError::Malformed { token } => Self::InvalidCursor { token },
        }
    }
}

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
