//! Response envelope shared by every Transloc endpoint
//!
//! Each response wraps the actual payload in `data` next to rate-limit and
//! version metadata. Decode with the payload type as the generic parameter:
//!
//! ```
//! use integration_transloc::ResponseEnvelope;
//!
//! let body = r#"{
//!     "rate_limit": 1,
//!     "expires_in": 60.0,
//!     "api_latest_version": "1.2",
//!     "api_version": "1.2",
//!     "generated_on": "2021-06-24T15:31:39+00:00",
//!     "data": ["4011962"]
//! }"#;
//! let envelope: ResponseEnvelope<Vec<String>> = serde_json::from_str(body).unwrap();
//! assert_eq!(envelope.payload(), &vec!["4011962".to_string()]);
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Metadata wrapper around a response payload of type `T`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    rate_limit: i64,
    expires_in: f64,
    api_latest_version: String,
    api_version: String,
    generated_on: String,
    #[serde(
        deserialize_with = "required",
        bound(deserialize = "T: Deserialize<'de>")
    )]
    data: T,
}

/// Plain field decode; with `deserialize_with` serde reports an absent key
/// as `missing field` even when `T` is an `Option`
fn required<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer)
}

impl<T> ResponseEnvelope<T> {
    /// Wrap `data` with the given metadata
    #[must_use]
    pub fn new(
        rate_limit: i64,
        expires_in: f64,
        api_version: impl Into<String>,
        api_latest_version: impl Into<String>,
        generated_on: impl Into<String>,
        data: T,
    ) -> Self {
        Self {
            rate_limit,
            expires_in,
            api_latest_version: api_latest_version.into(),
            api_version: api_version.into(),
            generated_on: generated_on.into(),
            data,
        }
    }

    /// Rate limit stated by the server
    #[must_use]
    pub const fn rate_limit(&self) -> i64 {
        self.rate_limit
    }

    /// Seconds until the data goes stale
    #[must_use]
    pub const fn expires_in(&self) -> f64 {
        self.expires_in
    }

    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    #[must_use]
    pub fn api_latest_version(&self) -> &str {
        &self.api_latest_version
    }

    /// The generation timestamp as sent by the server
    #[must_use]
    pub fn generated_on_raw(&self) -> &str {
        &self.generated_on
    }

    /// When the server generated the response
    ///
    /// An unparseable timestamp yields [`DateTime::<Utc>::MIN_UTC`] rather
    /// than failing.
    #[must_use]
    pub fn generated_on(&self) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(&self.generated_on)
            .map_or(DateTime::<Utc>::MIN_UTC, |time| time.with_timezone(&Utc))
    }

    #[must_use]
    pub const fn payload(&self) -> &T {
        &self.data
    }

    #[must_use]
    pub fn into_payload(self) -> T {
        self.data
    }
}

impl<T> fmt::Display for ResponseEnvelope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ResponseEnvelope:")?;
        writeln!(
            f,
            "\tgenerated: {} expires in {} sec  Rate limit: {}",
            self.generated_on, self.expires_in, self.rate_limit
        )?;
        write!(
            f,
            "\tAPI version: {} latest: {}",
            self.api_version, self.api_latest_version
        )
    }
}
