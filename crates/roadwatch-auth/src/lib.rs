//! Login client for roadwatch.
//!
//! This crate talks to the backend's authentication endpoints:
//!
//! - `POST <auth-base>/login` with `{ email, password }`, answered with
//!   `{ access_token, role, name }` on success or `{ msg }` on failure
//! - `GET <auth-base>/me`, used through the session gateway once a session
//!   exists
//!
//! It does not store anything. Persisting the session is the gateway's job;
//! this crate only turns credentials into a [`LoginResponse`].
//!
//! # Example
//!
//! ```no_run
//! use roadwatch_auth::{AuthConfig, Authenticator, Credentials, HttpAuthenticator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let authenticator = HttpAuthenticator::new(AuthConfig::default())?;
//!
//! let credentials = Credentials::new("citizen@test.com", "password_citizen");
//! let login = authenticator.login(&credentials).await?;
//!
//! println!("Logged in as {} ({})", login.name, login.role);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod error;

pub use client::{Authenticator, Credentials, HttpAuthenticator, LoginResponse, UserProfile};
pub use error::{AuthError, Result};

#[cfg(any(test, feature = "test-utils"))]
pub use client::MockAuthenticator;

/// Configuration for the backend's authentication endpoints.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base URL of the backend (e.g., `http://localhost:5000`).
    pub base_url: String,
    /// Path prefix of the authentication blueprint.
    pub auth_path: String,
    /// Timeout for a login request, in seconds.
    pub request_timeout_seconds: u64,
}

impl AuthConfig {
    /// Create a configuration for the given backend base URL.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Get the authentication base URL (`<base>/api/auth`).
    #[must_use]
    pub fn auth_base(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.auth_path.trim_matches('/')
        )
    }

    /// Get the login endpoint URL.
    #[must_use]
    pub fn login_url(&self) -> String {
        format!("{}/login", self.auth_base())
    }

    /// Get the current-user endpoint URL.
    #[must_use]
    pub fn me_url(&self) -> String {
        format!("{}/me", self.auth_base())
    }

    /// Get the request timeout as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            auth_path: "/api/auth".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.auth_path, "/api/auth");
        assert_eq!(config.request_timeout_seconds, 30);
    }

    #[test]
    fn config_urls() {
        let config = AuthConfig::default();
        assert_eq!(config.auth_base(), "http://localhost:5000/api/auth");
        assert_eq!(config.login_url(), "http://localhost:5000/api/auth/login");
        assert_eq!(config.me_url(), "http://localhost:5000/api/auth/me");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = AuthConfig::with_base_url("https://roads.example.org/");
        assert_eq!(
            config.login_url(),
            "https://roads.example.org/api/auth/login"
        );
    }

    #[test]
    fn auth_error_rejection() {
        assert!(AuthError::LoginFailed("Invalid credentials".into()).is_rejection());
        assert!(AuthError::UnknownRole("admin".into()).is_rejection());
        assert!(!AuthError::Transport("connection refused".into()).is_rejection());
        assert!(!AuthError::InvalidResponse("eof".into()).is_rejection());
    }
}
