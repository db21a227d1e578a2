//! Error types for the protomcp-common library.
//!
//! Only the HTTP boundary ([`crate::web`]) produces errors. Descriptor
//! classification and traversal report "wrong shape" and "not found" through
//! `Option`/`bool` results instead.

use thiserror::Error;

/// Result type alias for protomcp-common operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error produced by an HTTP body implementation
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for the HTTP JSON boundary
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The request body exceeded the configured decode limit
    #[error("request body too large (limit is {limit} bytes)")]
    BodyTooLarge {
        /// Limit that was exceeded, in bytes
        limit: usize,
    },

    /// Reading the request body failed
    #[error("failed to read request body: {0}")]
    BodyRead(#[source] BoxError),

    /// The payload was not valid JSON for the target type, or could not be
    /// marshaled to JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Converting between a typed message and its dynamic form failed
    #[error("failed to transcode protobuf message: {0}")]
    Transcode(#[from] prost::DecodeError),

    /// Assembling the HTTP response failed
    #[error("failed to build response: {0}")]
    Http(#[from] http::Error),

    /// A required argument was missing or unusable
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Creates a new body read error
    pub fn body_read(source: impl Into<BoxError>) -> Self {
        Self::BodyRead(source.into())
    }

    /// Creates a new invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Returns true if the error was caused by the request payload
    /// rather than by the server side.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::BodyTooLarge { .. } | Self::Json(_))
    }
}
