//! Transloc client error types

use thiserror::Error;

use crate::verbs::Verb;

/// Errors raised while loading or reading the client configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration has been loaded yet
    #[error("Configuration has not been loaded")]
    NotConfigured,

    /// Configuration is loaded but lacks the requested key
    #[error("Configuration is missing key: {0}")]
    MissingKey(String),

    /// The configuration payload contained no bytes
    #[error("Configuration payload is empty")]
    EmptyPayload,

    /// The configuration location is not a local file
    #[error("Not a file location: {0}")]
    NotAFileReference(String),

    /// The configuration payload is not a string-to-string table
    #[error("Malformed configuration payload: {0}")]
    MalformedPayload(String),

    /// The configuration file could not be read
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while building, issuing, or decoding a query
#[derive(Debug, Error)]
pub enum TranslocError {
    /// Configuration lookup failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The request URL could not be formed
    #[error("Generated URL is bad: {0}")]
    BadUrl(String),

    /// The agency selection was empty
    #[error("Agency must be specified for {0}")]
    MustSpecifyAgency(Verb),

    /// Routes were given for a verb that does not accept them
    #[error("{0} must not specify routes")]
    MustNotSpecifyRoutes(Verb),

    /// A configured value cannot be sent as the named header
    #[error("Invalid value for header {0}")]
    InvalidHeader(&'static str),

    /// The transport failed before a response arrived
    #[error("Request failed: {0}")]
    Transport(String),

    /// The transport gave up waiting for a response
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// The transport produced a response without status metadata
    #[error("Transport returned no response metadata")]
    FatalMissingResponse,

    /// The server answered outside of `200..400`
    #[error("Bad HTTP status code: {0}")]
    BadStatusCode(u16),

    /// The response body is not a valid envelope for the payload type
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl TranslocError {
    /// Returns true if this error comes from the configuration store
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns true if the query was rejected before any network call
    #[must_use]
    pub const fn is_query_construction_error(&self) -> bool {
        matches!(
            self,
            Self::BadUrl(_)
                | Self::MustSpecifyAgency(_)
                | Self::MustNotSpecifyRoutes(_)
                | Self::InvalidHeader(_)
        )
    }

    /// The HTTP status code, if the server rejected the request
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::BadStatusCode(code) => Some(*code),
            _ => None,
        }
    }
}
