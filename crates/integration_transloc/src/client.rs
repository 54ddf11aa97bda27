//! Transloc client: request building plus the fetch/decode pipeline
//!
//! A fetch runs four fallible steps in order: issue the request, check the
//! HTTP status, decode the [`ResponseEnvelope`], extract the payload. The
//! first failure ends the call; nothing is retried and no partial result
//! is returned. Dropping the returned future cancels the remaining steps.

use std::sync::Arc;

use domain::{AgencySet, RouteId};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::ApiConfiguration;
use crate::envelope::ResponseEnvelope;
use crate::error::{ConfigError, TranslocError};
use crate::transport::{ReqwestTransport, Transport, TransportResponse};
use crate::verbs::{RequestDescriptor, Verb, build_request};

/// Statuses accepted as success
const ACCEPTED_STATUS: std::ops::Range<u16> = 200..400;

/// Client for the Transloc API
///
/// Holds the shared configuration and a transport. Every call is
/// independent; the client carries no per-request state.
#[derive(Debug, Clone)]
pub struct TranslocClient<T = ReqwestTransport> {
    config: Arc<ApiConfiguration>,
    transport: T,
}

impl TranslocClient<ReqwestTransport> {
    /// Create a client using `reqwest`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] if `config` has not been
    /// loaded, or an error if the HTTP client cannot be initialized.
    pub fn new(config: Arc<ApiConfiguration>) -> Result<Self, TranslocError> {
        if !config.is_configured() {
            return Err(ConfigError::NotConfigured.into());
        }
        Ok(Self::with_transport(config, ReqwestTransport::new()?))
    }
}

impl<T: Transport> TranslocClient<T> {
    /// Create a client over an arbitrary transport
    pub const fn with_transport(config: Arc<ApiConfiguration>, transport: T) -> Self {
        Self { config, transport }
    }

    /// The configuration this client reads from
    #[must_use]
    pub fn config(&self) -> &ApiConfiguration {
        &self.config
    }

    /// Build the request for a query without sending it
    ///
    /// # Errors
    ///
    /// See [`build_request`].
    pub fn request(
        &self,
        verb: Verb,
        agencies: AgencySet,
        routes: Option<&[RouteId]>,
    ) -> Result<RequestDescriptor, TranslocError> {
        build_request(&self.config, verb, agencies, routes)
    }

    /// Build and run a query, returning the decoded payload
    ///
    /// # Errors
    ///
    /// Query-construction and configuration errors are returned before any
    /// network call; afterwards see [`TranslocClient::fetch`].
    #[instrument(skip_all, fields(%verb, %agencies))]
    pub async fn query<P: DeserializeOwned>(
        &self,
        verb: Verb,
        agencies: AgencySet,
        routes: Option<&[RouteId]>,
    ) -> Result<P, TranslocError> {
        let request = self.request(verb, agencies, routes)?;
        self.fetch(&request).await
    }

    /// Run a built request and return its payload
    ///
    /// # Errors
    ///
    /// Transport errors unchanged, [`TranslocError::FatalMissingResponse`],
    /// [`TranslocError::BadStatusCode`] or [`TranslocError::Decode`].
    pub async fn fetch<P: DeserializeOwned>(
        &self,
        request: &RequestDescriptor,
    ) -> Result<P, TranslocError> {
        Ok(self.fetch_envelope(request).await?.into_payload())
    }

    /// Run a built request and return the whole envelope
    ///
    /// Use this when the rate limit or version metadata matter.
    ///
    /// # Errors
    ///
    /// Same as [`TranslocClient::fetch`].
    #[instrument(skip(self, request), fields(url = %request.url()))]
    pub async fn fetch_envelope<P: DeserializeOwned>(
        &self,
        request: &RequestDescriptor,
    ) -> Result<ResponseEnvelope<P>, TranslocError> {
        let response = self.transport.execute(request).await?;
        decode_response(response)
    }
}

/// Validate a transport response and decode its envelope
///
/// # Errors
///
/// [`TranslocError::FatalMissingResponse`] without a status,
/// [`TranslocError::BadStatusCode`] outside `200..400` (the body is not
/// decoded), [`TranslocError::Decode`] for a body that does not match.
pub fn decode_response<P: DeserializeOwned>(
    response: TransportResponse,
) -> Result<ResponseEnvelope<P>, TranslocError> {
    let Some(status) = response.status else {
        return Err(TranslocError::FatalMissingResponse);
    };

    if !ACCEPTED_STATUS.contains(&status) {
        warn!(status, "Transloc request rejected");
        return Err(TranslocError::BadStatusCode(status));
    }

    let envelope: ResponseEnvelope<P> = serde_json::from_slice(&response.body)?;
    debug!(
        rate_limit = envelope.rate_limit(),
        api_version = envelope.api_version(),
        "Envelope decoded"
    );
    Ok(envelope)
}
