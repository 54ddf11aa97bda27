//! HTTP transport seam
//!
//! The fetch pipeline talks to the network through [`Transport`] so it can be
//! exercised without a server. [`ReqwestTransport`] is the production
//! implementation.

use async_trait::async_trait;
use bytes::Bytes;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::TranslocError;
use crate::verbs::RequestDescriptor;

/// Raw result of one request as seen by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status; `None` if the transport produced no status metadata
    pub status: Option<u16>,
    /// Response body
    pub body: Bytes,
}

impl TransportResponse {
    /// A response carrying an HTTP status
    #[must_use]
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status: Some(status),
            body: body.into(),
        }
    }
}

/// Executes built requests
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue the request once and collect the response
    async fn execute(
        &self,
        request: &RequestDescriptor,
    ) -> Result<TransportResponse, TranslocError>;
}

/// `reqwest`-backed transport
///
/// `reqwest` keeps no response cache, which matches the protocol-default
/// cache policy of every [`RequestDescriptor`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with its own connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self, TranslocError> {
        let client = Client::builder()
            .user_agent(concat!("transloc-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TranslocError::Transport(e.to_string()))?;

        Ok(Self { client })
    }

    /// Reuse an existing client
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(url = %request.url()))]
    async fn execute(
        &self,
        request: &RequestDescriptor,
    ) -> Result<TransportResponse, TranslocError> {
        let response = self
            .client
            .request(request.method().clone(), request.url().clone())
            .headers(request.headers().clone())
            .timeout(request.timeout())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranslocError::Timeout {
                        timeout_secs: request.timeout().as_secs(),
                    }
                } else {
                    TranslocError::Transport(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TranslocError::Transport(e.to_string()))?;

        debug!(status, bytes = body.len(), "Response received");
        Ok(TransportResponse {
            status: Some(status),
            body,
        })
    }
}
