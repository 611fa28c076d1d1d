//! Gateway configuration types.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for the session gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Base URL relative request paths are resolved against.
    #[serde(default = "GatewayConfig::default_api_base_url")]
    pub api_base_url: String,

    /// Where the user is sent on logout, missing session or role mismatch.
    #[serde(default = "GatewayConfig::default_login_page")]
    pub login_page: String,

    /// Immediate retries after a transport failure.
    #[serde(default = "GatewayConfig::default_retry_budget")]
    pub retry_budget: u32,

    /// Request timeout in seconds, enforced by the transport.
    #[serde(default = "GatewayConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl GatewayConfig {
    fn default_api_base_url() -> String {
        "http://localhost:5000".to_string()
    }

    fn default_login_page() -> String {
        "/index.html".to_string()
    }

    const fn default_retry_budget() -> u32 {
        1
    }

    const fn default_request_timeout() -> u64 {
        30
    }

    /// Get the request timeout as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Resolve a request target against `api_base_url`.
    ///
    /// Absolute `http(s)` URLs are returned unchanged.
    #[must_use]
    pub fn resolve_url(&self, target: &str) -> String {
        if target.starts_with("http://") || target.starts_with("https://") {
            return target.to_string();
        }
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            target.trim_start_matches('/')
        )
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_base_url: Self::default_api_base_url(),
            login_page: Self::default_login_page(),
            retry_budget: Self::default_retry_budget(),
            request_timeout_seconds: Self::default_request_timeout(),
        }
    }
}
