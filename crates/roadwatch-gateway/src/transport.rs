//! The wire seam.
//!
//! A `Transport` puts exactly one prepared request on the wire. Retry,
//! credential attachment and session teardown are the gateway's business.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::request::{ApiRequest, ApiResponse};

/// Trait for sending a single HTTP request.
///
/// This trait abstracts the HTTP client, allowing for scripted
/// implementations in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return whatever response arrives.
    ///
    /// Every received response is `Ok`, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns an error only if no response was received. Once a status
    /// line has arrived the call succeeds, even if the body is lost.
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: std::time::Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Other(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Create a transport with a custom reqwest client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone());

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();

        // The status line has arrived; a broken body must not turn this
        // into a resendable failure.
        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                tracing::warn!(
                    url = %request.url,
                    status = %status,
                    error = %e,
                    "Response body could not be read"
                );
                Vec::new()
            }
        };

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

/// A transport that plays back a script of outcomes.
///
/// Each `send` pops the next scripted outcome and records the request it
/// was given. Once the script is exhausted every call answers `200` with an
/// empty body.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: parking_lot::Mutex<std::collections::VecDeque<Result<ApiResponse, TransportError>>>,
    sent: parking_lot::Mutex<Vec<ApiRequest>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl ScriptedTransport {
    /// Create a transport with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a response with the given status and body.
    #[must_use]
    pub fn respond(self, status: u16, body: &str) -> Self {
        let status = reqwest::StatusCode::from_u16(status).unwrap_or(reqwest::StatusCode::OK);
        self.script
            .lock()
            .push_back(Ok(ApiResponse::new(status, body.as_bytes().to_vec())));
        self
    }

    /// Append a transport failure.
    #[must_use]
    pub fn fail(self, error: TransportError) -> Self {
        self.script.lock().push_back(Err(error));
        self
    }

    /// Requests received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.sent.lock().clone()
    }

    /// Number of `send` calls so far.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.sent.lock().len()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.sent.lock().push(request.clone());
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::new(reqwest::StatusCode::OK, Vec::new())))
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        (**self).send(request).await
    }
}
