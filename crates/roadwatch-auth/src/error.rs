//! Authentication error types.

use thiserror::Error;

/// A result type using `AuthError`.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur while establishing a session.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend rejected the credentials; carries the backend's `msg`.
    #[error("login failed: {0}")]
    LoginFailed(String),

    /// The backend reported a role outside the known set.
    #[error("unknown role in login response: {0}")]
    UnknownRole(String),

    /// The login request never produced a response.
    #[error("login request failed: {0}")]
    Transport(String),

    /// The login response could not be decoded.
    #[error("invalid login response: {0}")]
    InvalidResponse(String),
}

impl AuthError {
    /// Returns `true` if the backend answered and refused the login.
    ///
    /// Transport and decoding problems are not rejections; trying again may
    /// succeed without changing the credentials.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::LoginFailed(_) | Self::UnknownRole(_))
    }
}
