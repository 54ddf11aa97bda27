//! Query verbs and request construction
//!
//! Each [`Verb`] maps to one Transloc resource. [`build_url`] and
//! [`build_request`] validate the agency selection and route filter for the
//! verb before anything touches the network.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use domain::{AgencySet, RouteId};
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::{ApiConfiguration, ConfigKey};
use crate::error::TranslocError;

/// Header carrying the RapidAPI host
pub const HOST_HEADER: &str = "x-rapidapi-host";

/// Header carrying the RapidAPI key
pub const KEY_HEADER: &str = "x-rapidapi-key";

/// Timeout applied to every request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The queries supported by Transloc OpenAPI 1.2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verb {
    /// Agencies served by the API
    Agencies,
    /// Routes per agency
    Routes,
    /// Encoded route segments
    Segments,
    /// Live vehicle positions
    Vehicles,
    /// Stops per agency
    Stops,
    /// Arrival estimates per stop
    ArrivalEstimates,
}

struct VerbInfo {
    path: &'static str,
    route_qualifiable: bool,
}

/// Indexed by `Verb as usize`
static CATALOG: [VerbInfo; 6] = [
    VerbInfo {
        path: "agencies",
        route_qualifiable: false,
    },
    VerbInfo {
        path: "routes",
        route_qualifiable: false,
    },
    VerbInfo {
        path: "segments",
        route_qualifiable: true,
    },
    VerbInfo {
        path: "vehicles",
        route_qualifiable: true,
    },
    VerbInfo {
        path: "stops",
        route_qualifiable: false,
    },
    VerbInfo {
        path: "arrival-estimates",
        route_qualifiable: false,
    },
];

impl Verb {
    /// Every verb, in catalog order
    pub const ALL: [Self; 6] = [
        Self::Agencies,
        Self::Routes,
        Self::Segments,
        Self::Vehicles,
        Self::Stops,
        Self::ArrivalEstimates,
    ];

    fn info(self) -> &'static VerbInfo {
        &CATALOG[self as usize]
    }

    /// Resource name, e.g. `arrival-estimates`
    #[must_use]
    pub fn path(self) -> &'static str {
        self.info().path
    }

    /// Whether a query for this verb may be narrowed to a list of routes
    #[must_use]
    pub fn is_route_qualifiable(self) -> bool {
        self.info().route_qualifiable
    }

    /// `{scheme}://{host}/{path}.json` for the configured host
    ///
    /// # Errors
    ///
    /// Propagates configuration lookup failures.
    pub fn base_url(self, config: &ApiConfiguration) -> Result<String, TranslocError> {
        let scheme = config.scheme()?;
        let host = config.host()?;
        Ok(format!("{scheme}://{host}/{}.json", self.path()))
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Error returned when a string names no known verb
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown verb: {0}")]
pub struct UnknownVerb(String);

impl FromStr for Verb {
    type Err = UnknownVerb;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|verb| verb.path() == s)
            .ok_or_else(|| UnknownVerb(s.to_string()))
    }
}

/// Caching behavior requested for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Follow whatever the HTTP protocol and the transport decide
    #[default]
    UseProtocolDefault,
}

/// A fully built, immutable GET request for one verb
///
/// The API key header is marked sensitive, so `Debug` output never shows it.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    verb: Verb,
    url: Url,
    method: Method,
    headers: HeaderMap,
    cache_policy: CachePolicy,
    timeout: Duration,
}

impl RequestDescriptor {
    #[must_use]
    pub const fn verb(&self) -> Verb {
        self.verb
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Value of a header, if present and valid UTF-8
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    #[must_use]
    pub const fn cache_policy(&self) -> CachePolicy {
        self.cache_policy
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Same request with a different timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Build the URL for a query
///
/// The agency fragment is always present; a non-empty route list adds a
/// `routes=` fragment and is only accepted by route-qualifiable verbs.
///
/// # Errors
///
/// - [`TranslocError::MustSpecifyAgency`] if `agencies` is empty
/// - [`TranslocError::MustNotSpecifyRoutes`] if routes are given for a verb
///   that does not take them
/// - configuration errors while resolving the host
/// - [`TranslocError::BadUrl`] if the result does not parse as a URL
pub fn build_url(
    config: &ApiConfiguration,
    verb: Verb,
    agencies: AgencySet,
    routes: Option<&[RouteId]>,
) -> Result<Url, TranslocError> {
    if agencies.is_empty() {
        return Err(TranslocError::MustSpecifyAgency(verb));
    }
    let mut fragments = vec![agencies.fragment()];

    if let Some(routes) = routes.filter(|routes| !routes.is_empty()) {
        if !verb.is_route_qualifiable() {
            return Err(TranslocError::MustNotSpecifyRoutes(verb));
        }
        let ids: Vec<&str> = routes.iter().map(RouteId::as_str).collect();
        fragments.push(format!("routes={}", ids.join(",")));
    }

    let url_string = format!("{}?{}", verb.base_url(config)?, fragments.join("&"));
    Url::parse(&url_string).map_err(|_| TranslocError::BadUrl(url_string))
}

/// Build the complete request for a query
///
/// Wraps [`build_url`] and adds the RapidAPI host and key headers, GET,
/// protocol-default caching and a [`REQUEST_TIMEOUT`] timeout.
///
/// # Errors
///
/// Everything [`build_url`] returns, plus configuration errors for the
/// host or key and [`TranslocError::InvalidHeader`] for values that cannot
/// be sent as headers.
pub fn build_request(
    config: &ApiConfiguration,
    verb: Verb,
    agencies: AgencySet,
    routes: Option<&[RouteId]>,
) -> Result<RequestDescriptor, TranslocError> {
    let url = build_url(config, verb, agencies, routes)?;

    let mut headers = HeaderMap::with_capacity(2);
    let host = HeaderValue::from_str(config.host()?)
        .map_err(|_| TranslocError::InvalidHeader(HOST_HEADER))?;
    let mut key = HeaderValue::from_str(config.get(ConfigKey::ApiKey)?.expose_secret())
        .map_err(|_| TranslocError::InvalidHeader(KEY_HEADER))?;
    key.set_sensitive(true);
    headers.insert(HeaderName::from_static(HOST_HEADER), host);
    headers.insert(HeaderName::from_static(KEY_HEADER), key);

    debug!(%verb, %url, "Built request");
    Ok(RequestDescriptor {
        verb,
        url,
        method: Method::GET,
        headers,
        cache_policy: CachePolicy::default(),
        timeout: REQUEST_TIMEOUT,
    })
}
