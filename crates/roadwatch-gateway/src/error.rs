//! Gateway error types.
//!
//! Business-level failures (4xx/5xx other than 401/403) are not errors at
//! this layer: they come back as an [`ApiResponse`](crate::ApiResponse) for
//! the caller to interpret.

use reqwest::StatusCode;
use thiserror::Error;

use roadwatch_auth::AuthError;
use roadwatch_store::StoreError;

/// A result type using `GatewayError`.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors produced by the session gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No session is stored; nothing was sent.
    #[error("no token found, please log in again")]
    MissingSession,

    /// The transport failed and the retry budget is exhausted.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The session store could not be written.
    #[error("session store error: {0}")]
    Store(#[from] StoreError),

    /// Establishing the session failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A response body did not have the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// A typed helper received a status it cannot turn into a value.
    #[error("unexpected status {0}")]
    UnexpectedStatus(StatusCode),
}

/// Network-level failures: no usable response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The request did not complete in time.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Any other transport failure.
    #[error("transport error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_body() || err.is_decode() {
            Self::Body(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

impl TransportError {
    /// Returns `true` if the request never reached the backend and may be
    /// sent again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Connect(_) | Self::Timeout(_))
    }
}

impl GatewayError {
    /// Returns `true` if the caller should send the user back to login.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::MissingSession)
    }
}
