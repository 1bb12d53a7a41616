//! Error types surfaced by the request pipeline and loader.

use std::io;

use thiserror::Error;

/// Primary error type for client operations.
///
/// Every failure of a request reaches the originating caller as one of these
/// variants; the pipeline never panics or swallows an outcome.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request required credentials but the session holds none.
    #[error("unauthorized")]
    Unauthorized,
    /// The access token expired and the refresh attempt did not produce a
    /// usable replacement.
    #[error("failed to refresh token")]
    RefreshFailed,
    /// The server rejected the request with a 400 and a message payload.
    #[error("server rejected request: {message}")]
    ServerRejected {
        /// Rejection reason supplied by the server.
        message: String,
    },
    /// Any other non-success HTTP status.
    #[error("unexpected status code {status}")]
    Http {
        /// Status code returned by the server.
        status: u16,
    },
    /// Network-level failure: connect, timeout, or body transfer.
    #[error("transport failure")]
    Transport {
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
    /// Request could not be constructed, e.g. a path that does not resolve
    /// against the configured base URL.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// What was wrong with the request.
        message: String,
    },
    /// Response body did not match the expected shape.
    #[error("failed to decode response body")]
    Decode {
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
    /// Reading or writing the persisted session record failed.
    #[error("session storage failed")]
    Storage {
        /// Operation identifier.
        operation: &'static str,
        /// Source IO error.
        #[source]
        source: io::Error,
    },
}

/// Convenience alias for client results.
pub type ClientResult<T> = Result<T, ClientError>;
