//! The session gateway.
//!
//! Single point of truth for "is there a logged-in user, what role do they
//! have, and should this request carry their credentials".

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use uuid::Uuid;

use roadwatch_auth::{AuthConfig, Authenticator, Credentials, UserProfile};
use roadwatch_core::{BearerToken, Role, Session};
use roadwatch_store::schema::{keys, SESSION_KEYS};
use roadwatch_store::SessionStore;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::navigator::Navigator;
use crate::request::{ApiRequest, ApiResponse};
use crate::transport::Transport;

/// Notice shown before a role mismatch ends the session.
pub const ACCESS_DENIED: &str = "Access Denied";

/// Outcome of a [`SessionGateway::require_role`] check.
///
/// Only `Granted` allows role-specific work to proceed. In both other cases
/// navigation to the login entry point is already underway.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleCheck {
    /// A session with the expected role exists.
    Granted,
    /// No session exists; the user was redirected to login.
    Redirected,
    /// A session with another role exists; it was torn down.
    Denied,
}

impl RoleCheck {
    /// Whether the caller may proceed.
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Owns the session lifecycle and mediates every authenticated request.
///
/// The store, transport and navigator are injected, so the gateway holds no
/// ambient state of its own.
pub struct SessionGateway<S, T, N>
where
    S: SessionStore,
    T: Transport,
    N: Navigator,
{
    store: Arc<S>,
    transport: T,
    navigator: Arc<N>,
    config: GatewayConfig,
}

impl<S, T, N> SessionGateway<S, T, N>
where
    S: SessionStore,
    T: Transport,
    N: Navigator,
{
    /// Create a new gateway.
    #[must_use]
    pub fn new(store: Arc<S>, transport: T, navigator: Arc<N>, config: GatewayConfig) -> Self {
        Self {
            store,
            transport,
            navigator,
            config,
        }
    }

    /// Get the gateway configuration.
    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Get the underlying session store.
    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    // =========================================================================
    // Session Lifecycle
    // =========================================================================

    /// Exchange credentials for a session and persist it.
    ///
    /// On failure nothing is stored and the backend's reason is surfaced.
    ///
    /// # Errors
    ///
    /// Returns `Auth` if the login is refused or fails, and `Store` if the
    /// session could not be persisted.
    pub async fn establish_session<A>(
        &self,
        authenticator: &A,
        credentials: &Credentials,
    ) -> Result<Session>
    where
        A: Authenticator + ?Sized,
    {
        let login = match authenticator.login(credentials).await {
            Ok(login) => login,
            Err(e) => {
                tracing::debug!(email = %credentials.email, "Login attempt refused");
                tracing::warn!(error = %e, "Login failed");
                return Err(e.into());
            }
        };

        let session = Session::new(login.token, login.role, login.name);

        if let Err(e) = self.write_session(&session) {
            // Never leave a partial session behind.
            self.clear_session();
            return Err(e);
        }

        tracing::info!(role = %session.role, "Session established");
        Ok(session)
    }

    /// Whether a token is currently stored.
    #[must_use]
    pub fn has_session(&self) -> bool {
        self.token().is_some()
    }

    /// The role claim of the stored session.
    ///
    /// An unreadable or unknown role tag reads as `None`.
    #[must_use]
    pub fn current_role(&self) -> Option<Role> {
        let raw = self.read(keys::ROLE)?;
        match raw.parse() {
            Ok(role) => Some(role),
            Err(e) => {
                tracing::warn!(error = %e, "Stored role is not recognized");
                None
            }
        }
    }

    /// The display name of the stored session.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        self.read(keys::USER_NAME)
    }

    /// The full stored session, if token and role are both present.
    #[must_use]
    pub fn current_session(&self) -> Option<Session> {
        let token = self.token()?;
        let role = self.current_role()?;
        let display_name = self.display_name().unwrap_or_default();
        Some(Session::new(token, role, display_name))
    }

    /// Page-entry guard.
    ///
    /// - no session: redirect to login, nothing else
    /// - another role: show [`ACCESS_DENIED`], then tear down as
    ///   [`destroy_session`](Self::destroy_session) does
    /// - expected role: no side effects
    pub fn require_role(&self, expected: Role) -> RoleCheck {
        if !self.has_session() {
            tracing::debug!(expected = %expected, "No session, redirecting to login");
            self.navigator.redirect(&self.config.login_page);
            return RoleCheck::Redirected;
        }

        match self.current_role() {
            Some(role) if role == expected => RoleCheck::Granted,
            actual => {
                tracing::warn!(
                    expected = %expected,
                    actual = ?actual,
                    "Role mismatch, ending session"
                );
                self.navigator.alert(ACCESS_DENIED);
                self.destroy_session();
                RoleCheck::Denied
            }
        }
    }

    /// Log out: clear the stored session and redirect to login.
    ///
    /// Idempotent. Without a session only the redirect happens.
    pub fn destroy_session(&self) {
        self.clear_session();
        tracing::info!(redirect = %self.config.login_page, "Session destroyed");
        self.navigator.redirect(&self.config.login_page);
    }

    // =========================================================================
    // Authenticated Requests
    // =========================================================================

    /// Send `request` with the session's credentials, using the configured
    /// retry budget.
    ///
    /// # Errors
    ///
    /// See [`dispatch_with_retries`](Self::dispatch_with_retries).
    pub async fn dispatch_authenticated(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.dispatch_with_retries(request, self.config.retry_budget)
            .await
    }

    /// Send `request` with the session's credentials.
    ///
    /// - no session: fails with `MissingSession`, nothing is sent
    /// - `Authorization: Bearer <token>` is attached; caller headers are
    ///   merged after it and win on conflict
    /// - a connect or timeout failure is retried immediately while
    ///   `retries_remaining > 0`; other transport failures are not
    /// - 401/403 destroys the session and returns the response, never
    ///   retried
    /// - any other response is returned verbatim
    ///
    /// The token is re-read before every attempt, so a retry after the
    /// session was torn down elsewhere fails with `MissingSession`.
    ///
    /// # Errors
    ///
    /// Returns `MissingSession`, `InvalidRequest` if the token cannot be
    /// used as a header value, or `Transport` once retries are exhausted.
    pub async fn dispatch_with_retries(
        &self,
        request: ApiRequest,
        retries_remaining: u32,
    ) -> Result<ApiResponse> {
        let request_id = Uuid::new_v4();
        let mut retries_remaining = retries_remaining;

        loop {
            let Some(token) = self.token() else {
                tracing::debug!(%request_id, url = %request.url, "No session, request not sent");
                return Err(GatewayError::MissingSession);
            };

            let prepared = self.prepare(&request, &token)?;
            tracing::debug!(
                %request_id,
                method = %prepared.method,
                url = %prepared.url,
                retries_remaining,
                "Dispatching authenticated request"
            );

            match self.transport.send(&prepared).await {
                Ok(response) if response.is_auth_failure() => {
                    tracing::warn!(
                        %request_id,
                        status = %response.status,
                        "Session expired or unauthorized"
                    );
                    self.destroy_session();
                    return Ok(response);
                }
                Ok(response) => {
                    tracing::debug!(%request_id, status = %response.status, "Response received");
                    return Ok(response);
                }
                Err(e) if e.is_retryable() && retries_remaining > 0 => {
                    tracing::warn!(
                        %request_id,
                        error = %e,
                        retries_remaining,
                        "Request failed, retrying"
                    );
                    retries_remaining -= 1;
                }
                Err(e) => {
                    tracing::error!(%request_id, error = %e, "Request failed");
                    return Err(e.into());
                }
            }
        }
    }

    /// Fetch the current user from `GET <auth-base>/me`.
    ///
    /// # Errors
    ///
    /// Any dispatch error, `UnexpectedStatus` for a non-2xx response (a
    /// 401/403 has already ended the session), or `Decode` for a malformed
    /// body.
    pub async fn fetch_profile(&self, auth: &AuthConfig) -> Result<UserProfile> {
        let response = self
            .dispatch_authenticated(ApiRequest::get(auth.me_url()))
            .await?;

        if !response.is_success() {
            return Err(GatewayError::UnexpectedStatus(response.status));
        }

        response.json()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Resolve the URL and build the outgoing headers.
    fn prepare(&self, request: &ApiRequest, token: &BearerToken) -> Result<ApiRequest> {
        let mut bearer = HeaderValue::from_str(&token.authorization_value())
            .map_err(|_| GatewayError::InvalidRequest("stored token is not a valid header value".into()))?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::with_capacity(request.headers.len() + 1);
        headers.insert(AUTHORIZATION, bearer);
        // Replaces per name, so caller headers win.
        headers.extend(request.headers.clone());

        Ok(ApiRequest {
            method: request.method.clone(),
            url: self.config.resolve_url(&request.url),
            headers,
            body: request.body.clone(),
        })
    }

    fn token(&self) -> Option<BearerToken> {
        self.read(keys::TOKEN)
            .filter(|token| !token.is_empty())
            .map(BearerToken::from)
    }

    /// Read a key, treating store failures as absence.
    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Session store read failed");
                None
            }
        }
    }

    fn write_session(&self, session: &Session) -> Result<()> {
        self.store.set(keys::TOKEN, session.token.as_str())?;
        self.store.set(keys::ROLE, session.role.as_str())?;
        self.store.set(keys::USER_NAME, &session.display_name)?;
        Ok(())
    }

    fn clear_session(&self) {
        for key in SESSION_KEYS {
            if let Err(e) = self.store.remove(key) {
                tracing::error!(key, error = %e, "Failed to clear session entry");
            }
        }
    }
}
