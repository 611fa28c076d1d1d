//! Login client and wire types.
//!
//! The login call is the only request the client makes without a bearer
//! token, so it does not go through the session gateway.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use roadwatch_core::{BearerToken, Role};

use crate::error::{AuthError, Result};
use crate::AuthConfig;

/// Fallback message when a failed login carries no `msg`.
const DEFAULT_LOGIN_FAILURE: &str = "Login failed";

/// Request payload for email/password login.
#[derive(Clone, Serialize)]
pub struct Credentials {
    /// User's email address.
    pub email: String,
    /// User's password.
    pub password: String,
}

impl Credentials {
    /// Create a credential pair.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response from a successful login.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub token: BearerToken,
    /// Role claim of the user.
    pub role: Role,
    /// Display name of the user.
    pub name: String,
}

/// The current user as reported by `GET <auth-base>/me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    /// Backend user identifier.
    pub id: String,
    /// Email address on record.
    pub email: String,
    /// Role claim carried by the token.
    pub role: Role,
    /// Display name.
    pub name: String,
}

/// Raw response from the login endpoint.
#[derive(Debug, Deserialize)]
struct RawLoginResponse {
    access_token: String,
    role: String,
    name: String,
}

/// Error response from the backend.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    msg: Option<String>,
}

/// Trait for exchanging credentials for a session.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns `LoginFailed` with the backend's reason if the credentials
    /// are refused, `UnknownRole` if the backend reports a role outside the
    /// known set, and `Transport`/`InvalidResponse` for anything else.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse>;
}

/// Client for the backend's login endpoint.
pub struct HttpAuthenticator {
    config: AuthConfig,
    client: reqwest::Client,
}

impl HttpAuthenticator {
    /// Create a new login client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the HTTP client cannot be built.
    pub fn new(config: AuthConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AuthError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Create a login client with a custom reqwest client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: AuthConfig) -> Self {
        Self { config, client }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Handle the HTTP response and convert to `LoginResponse`.
    async fn handle_response(response: reqwest::Response) -> Result<LoginResponse> {
        let status = response.status();

        if status.is_success() {
            let raw: RawLoginResponse = response
                .json()
                .await
                .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

            let role = raw
                .role
                .parse::<Role>()
                .map_err(|_| AuthError::UnknownRole(raw.role.clone()))?;

            return Ok(LoginResponse {
                token: BearerToken::new(raw.access_token),
                role,
                name: raw.name,
            });
        }

        let message = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .and_then(|body| body.msg)
            .unwrap_or_else(|| DEFAULT_LOGIN_FAILURE.to_string());

        tracing::debug!(status = %status, reason = %message, "Login rejected");

        Err(AuthError::LoginFailed(message))
    }
}

#[async_trait]
impl Authenticator for HttpAuthenticator {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let url = self.config.login_url();
        tracing::debug!(url = %url, email = %credentials.email, "Sending login request");

        let response = self
            .client
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        Self::handle_response(response).await
    }
}

/// A mock authenticator for testing.
///
/// Knows a fixed set of users and issues tokens of the form
/// `mock-token:<email>`.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct MockAuthenticator {
    users: parking_lot::RwLock<std::collections::HashMap<String, MockUser>>,
    attempts: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Clone)]
struct MockUser {
    password: String,
    role: Role,
    name: String,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockAuthenticator {
    /// Create an authenticator with no users.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an authenticator knowing the backend's development users.
    #[must_use]
    pub fn with_dev_users() -> Self {
        let auth = Self::new();
        auth.add_user("citizen@test.com", "password_citizen", Role::Citizen, "Test Citizen");
        auth.add_user(
            "official@test.com",
            "password_official",
            Role::Official,
            "Test Official",
        );
        auth
    }

    /// Register a user.
    pub fn add_user(&self, email: &str, password: &str, role: Role, name: &str) {
        self.users.write().insert(
            email.to_string(),
            MockUser {
                password: password.to_string(),
                role,
                name: name.to_string(),
            },
        );
    }

    /// Number of login attempts seen so far.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        self.attempts
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        let users = self.users.read();
        match users.get(&credentials.email) {
            Some(user) if user.password == credentials.password => Ok(LoginResponse {
                token: BearerToken::new(format!("mock-token:{}", credentials.email)),
                role: user.role,
                name: user.name.clone(),
            }),
            _ => Err(AuthError::LoginFailed("Invalid credentials".to_string())),
        }
    }
}
