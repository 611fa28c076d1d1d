//! The client-held session record.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::role::Role;

/// An opaque bearer credential issued by the login endpoint.
///
/// The token is never interpreted on the client. `Debug` output is redacted
/// so tokens do not leak into logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The value for an `Authorization` header: `Bearer <token>`.
    #[must_use]
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

impl From<String> for BearerToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The logged-in user as seen by the client.
///
/// At most one session exists per storage context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Credential attached to every authenticated request.
    pub token: BearerToken,
    /// Role claim used for entry gating.
    pub role: Role,
    /// Name shown to the user; not used for any decision.
    pub display_name: String,
}

impl Session {
    /// Create a session record.
    #[must_use]
    pub fn new(token: BearerToken, role: Role, display_name: impl Into<String>) -> Self {
        Self {
            token,
            role,
            display_name: display_name.into(),
        }
    }
}
