//! Subcommand handlers.
//!
//! Each handler writes its user-facing output to `out` and reports whether
//! the command succeeded. Gateway side effects (redirects, alerts) go
//! through the gateway's navigator.

use std::io::{self, Write};

use anyhow::Context;
use roadwatch_auth::{AuthConfig, Authenticator, Credentials};
use roadwatch_core::Role;
use roadwatch_gateway::{
    ApiRequest, ApiResponse, GatewayError, Navigator, SessionGateway, Transport,
};
use roadwatch_store::SessionStore;

/// Log in and persist the session.
pub async fn login<S, T, N, A>(
    gateway: &SessionGateway<S, T, N>,
    authenticator: &A,
    credentials: &Credentials,
    out: &mut impl Write,
) -> anyhow::Result<bool>
where
    S: SessionStore,
    T: Transport,
    N: Navigator,
    A: Authenticator + ?Sized,
{
    match gateway.establish_session(authenticator, credentials).await {
        Ok(session) => {
            writeln!(out, "Welcome, {} ({})", session.display_name, session.role)?;
            Ok(true)
        }
        Err(GatewayError::Auth(e)) if e.is_rejection() => {
            writeln!(out, "{e}")?;
            Ok(false)
        }
        Err(e) => Err(e).context("could not log in"),
    }
}

/// Log out. Always succeeds.
pub fn logout<S, T, N>(gateway: &SessionGateway<S, T, N>, out: &mut impl Write) -> anyhow::Result<bool>
where
    S: SessionStore,
    T: Transport,
    N: Navigator,
{
    gateway.destroy_session();
    writeln!(out, "Logged out")?;
    Ok(true)
}

/// Show the stored session, or the backend's view of it with `remote`.
pub async fn whoami<S, T, N>(
    gateway: &SessionGateway<S, T, N>,
    remote: Option<&AuthConfig>,
    out: &mut impl Write,
) -> anyhow::Result<bool>
where
    S: SessionStore,
    T: Transport,
    N: Navigator,
{
    let Some(session) = gateway.current_session() else {
        writeln!(out, "Not logged in")?;
        return Ok(false);
    };

    match remote {
        None => {
            let name = if session.display_name.is_empty() {
                "(unnamed)"
            } else {
                session.display_name.as_str()
            };
            writeln!(out, "{name} ({})", session.role)?;
        }
        Some(auth) => {
            let profile = gateway
                .fetch_profile(auth)
                .await
                .context("could not fetch profile")?;
            writeln!(out, "{} <{}> ({})", profile.name, profile.email, profile.role)?;
        }
    }

    Ok(true)
}

/// Send an authenticated request, optionally behind a role guard.
pub async fn send<S, T, N>(
    gateway: &SessionGateway<S, T, N>,
    request: ApiRequest,
    role: Option<Role>,
    out: &mut impl Write,
) -> anyhow::Result<bool>
where
    S: SessionStore,
    T: Transport,
    N: Navigator,
{
    if let Some(role) = role {
        if !gateway.require_role(role).is_granted() {
            return Ok(false);
        }
    }

    let response = match gateway.dispatch_authenticated(request).await {
        Ok(response) => response,
        Err(GatewayError::MissingSession) => {
            writeln!(out, "Not logged in. Run `roadwatch login` first.")?;
            return Ok(false);
        }
        Err(e) => return Err(e).context("request failed"),
    };

    writeln!(out, "{}", response.status)?;
    write_body(&response, out)?;
    Ok(response.is_success())
}

/// Build a JSON `POST` from the raw `--json` argument.
pub fn post_request(path: &str, body: &str) -> anyhow::Result<ApiRequest> {
    let value: serde_json::Value =
        serde_json::from_str(body).context("--json must be a valid JSON document")?;
    Ok(ApiRequest::post(path).json(&value)?)
}

/// Pretty-print JSON bodies, pass anything else through.
fn write_body(response: &ApiResponse, out: &mut impl Write) -> io::Result<()> {
    if response.body.is_empty() {
        return Ok(());
    }

    match serde_json::from_slice::<serde_json::Value>(&response.body) {
        Ok(value) => writeln!(out, "{}", serde_json::to_string_pretty(&value)?),
        Err(_) => writeln!(out, "{}", response.text()),
    }
}
