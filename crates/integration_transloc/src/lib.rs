//! Transloc OpenAPI 1.2 client
//!
//! Typed access to the Transloc transit API served through RapidAPI, covering
//! the UChicago shuttle lines and the CTA bus lines.
//!
//! # Architecture
//!
//! - [`ApiConfiguration`] holds the RapidAPI host and key. It is loaded once
//!   at startup and shared read-only.
//! - [`Verb`] enumerates the supported queries; [`build_url`] and
//!   [`build_request`] turn a verb, an [`AgencySet`](domain::AgencySet) and an
//!   optional route filter into a validated [`RequestDescriptor`].
//! - [`TranslocClient`] issues the request over a [`Transport`], checks the
//!   status and decodes the [`ResponseEnvelope`] into the caller's payload type.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use domain::AgencySet;
//! use integration_transloc::{ApiConfiguration, TranslocClient, Verb};
//!
//! let mut config = ApiConfiguration::new();
//! config.configure_from_path("RapidAPIKeys.toml")?;
//! let client = TranslocClient::new(Arc::new(config))?;
//!
//! let stops: serde_json::Value = client.query(Verb::Stops, AgencySet::ALL, None).await?;
//! ```

mod client;
mod config;
mod envelope;
mod error;
mod transport;
mod verbs;

pub use client::{TranslocClient, decode_response};
pub use config::{ApiConfiguration, ConfigKey};
pub use envelope::ResponseEnvelope;
pub use error::{ConfigError, TranslocError};
pub use transport::{ReqwestTransport, Transport, TransportResponse};
pub use verbs::{
    CachePolicy, HOST_HEADER, KEY_HEADER, REQUEST_TIMEOUT, RequestDescriptor, UnknownVerb, Verb,
    build_request, build_url,
};
