//! Client configuration store
//!
//! Holds the RapidAPI host and key the client needs to address the Transloc
//! API. The store is built once at startup, configured from a map, a TOML
//! payload, or a local file, and then shared read-only (typically behind an
//! `Arc`) with the request builder and the client.
//!
//! Values are held as [`SecretString`]; callers expose them explicitly.
//!
//! A configuration file looks like:
//!
//! ```toml
//! host = "transloc-api-1-2.p.rapidapi.com"
//! apiKey = "your-rapidapi-key"
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::ConfigError;

/// Well-known configuration keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    /// RapidAPI host serving the Transloc API
    Host,
    /// RapidAPI key
    ApiKey,
    /// URL scheme for requests; optional, defaults to `https`
    Scheme,
}

impl ConfigKey {
    /// Key name as it appears in the configuration payload
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::ApiKey => "apiKey",
            Self::Scheme => "scheme",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value configuration for the Transloc client
///
/// Empty until one of the `configure_*` methods is called with a non-empty
/// mapping. Lookups distinguish "not configured yet" from "missing key".
#[derive(Clone, Default)]
pub struct ApiConfiguration {
    values: HashMap<String, SecretString>,
}

impl ApiConfiguration {
    /// Create an empty, unconfigured store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store configured from `values`
    #[must_use]
    pub fn from_map(values: HashMap<String, String>) -> Self {
        let mut config = Self::new();
        config.configure_from_map(values);
        config
    }

    /// Replace the stored mapping
    ///
    /// Calling this again simply replaces the previous mapping.
    pub fn configure_from_map(&mut self, values: HashMap<String, String>) {
        info!(keys = values.len(), "Configuration loaded");
        self.values = values
            .into_iter()
            .map(|(key, value)| (key, SecretString::from(value)))
            .collect();
    }

    /// Configure from a TOML payload of string keys and string values
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPayload`] for an empty payload and
    /// [`ConfigError::MalformedPayload`] if it is not a string table.
    pub fn configure_from_bytes(&mut self, bytes: &[u8]) -> Result<(), ConfigError> {
        if bytes.is_empty() {
            return Err(ConfigError::EmptyPayload);
        }

        let text = std::str::from_utf8(bytes)
            .map_err(|e| ConfigError::MalformedPayload(e.to_string()))?;
        let values: HashMap<String, String> =
            toml::from_str(text).map_err(|e| ConfigError::MalformedPayload(e.to_string()))?;

        self.configure_from_map(values);
        Ok(())
    }

    /// Configure from the file at a `file:` location
    ///
    /// Only the scheme is checked up front; a missing file surfaces as
    /// [`ConfigError::Io`] when it is read.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotAFileReference`] for non-`file:` locations,
    /// plus any read or payload error.
    #[instrument(skip_all, fields(location = %location))]
    pub fn configure_from_location(&mut self, location: &Url) -> Result<(), ConfigError> {
        if location.scheme() != "file" {
            return Err(ConfigError::NotAFileReference(location.to_string()));
        }
        let path = location
            .to_file_path()
            .map_err(|()| ConfigError::NotAFileReference(location.to_string()))?;

        debug!(path = %path.display(), "Reading configuration file");
        let bytes = std::fs::read(&path)?;
        self.configure_from_bytes(&bytes)
    }

    /// Configure from a file path, relative to the working directory if not absolute
    ///
    /// # Errors
    ///
    /// Same as [`ApiConfiguration::configure_from_location`].
    pub fn configure_from_path(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let absolute = std::path::absolute(path)?;
        let location = Url::from_file_path(&absolute)
            .map_err(|()| ConfigError::NotAFileReference(path.display().to_string()))?;
        self.configure_from_location(&location)
    }

    /// Whether a non-empty mapping has been loaded
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.values.is_empty()
    }

    /// Look up a configuration value by key name
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] before configuration and
    /// [`ConfigError::MissingKey`] if the key is absent.
    pub fn value(&self, key: &str) -> Result<&SecretString, ConfigError> {
        if !self.is_configured() {
            return Err(ConfigError::NotConfigured);
        }
        self.values
            .get(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
    }

    /// Look up a well-known configuration value
    ///
    /// # Errors
    ///
    /// See [`ApiConfiguration::value`].
    pub fn get(&self, key: ConfigKey) -> Result<&SecretString, ConfigError> {
        self.value(key.as_str())
    }

    /// RapidAPI host the requests are addressed to
    ///
    /// # Errors
    ///
    /// See [`ApiConfiguration::value`].
    pub fn host(&self) -> Result<&str, ConfigError> {
        self.get(ConfigKey::Host).map(|host| host.expose_secret())
    }

    /// Scheme used for request URLs
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] before configuration.
    pub fn scheme(&self) -> Result<&str, ConfigError> {
        match self.get(ConfigKey::Scheme) {
            Ok(scheme) => Ok(scheme.expose_secret()),
            Err(ConfigError::MissingKey(_)) => Ok("https"),
            Err(e) => Err(e),
        }
    }
}

impl fmt::Debug for ApiConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("ApiConfiguration")
            .field("keys", &keys)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn sample_map() -> HashMap<String, String> {
        HashMap::from([
            ("host".to_string(), "h".to_string()),
            ("apiKey".to_string(), "k".to_string()),
        ])
    }

    #[test]
    fn test_unconfigured_lookup_fails() {
        let config = ApiConfiguration::new();
        assert!(!config.is_configured());
        assert!(matches!(config.value("host"), Err(ConfigError::NotConfigured)));
    }

    #[test]
    fn test_configured_lookup() {
        let config = ApiConfiguration::from_map(sample_map());
        assert!(config.is_configured());
        assert_eq!(config.value("host").unwrap().expose_secret(), "h");
        assert_eq!(config.get(ConfigKey::ApiKey).unwrap().expose_secret(), "k");
        assert_eq!(config.host().unwrap(), "h");
        assert!(matches!(
            config.value("missing"),
            Err(ConfigError::MissingKey(key)) if key == "missing"
        ));
    }

    #[test]
    fn test_reconfigure_replaces_mapping() {
        let mut config = ApiConfiguration::from_map(sample_map());
        config.configure_from_map(HashMap::from([("host".to_string(), "other".to_string())]));
        assert_eq!(config.host().unwrap(), "other");
        assert!(matches!(config.value("apiKey"), Err(ConfigError::MissingKey(_))));
    }

    #[test]
    fn test_empty_map_stays_unconfigured() {
        let mut config = ApiConfiguration::new();
        config.configure_from_map(HashMap::new());
        assert!(!config.is_configured());
    }

    #[test]
    fn test_configure_from_bytes() {
        let mut config = ApiConfiguration::new();
        config
            .configure_from_bytes(b"host = \"example.test\"\napiKey = \"secret\"\n")
            .unwrap();
        assert_eq!(config.host().unwrap(), "example.test");
        assert_eq!(config.get(ConfigKey::ApiKey).unwrap().expose_secret(), "secret");
    }

    #[test]
    fn test_configure_from_empty_bytes() {
        let mut config = ApiConfiguration::new();
        assert!(matches!(
            config.configure_from_bytes(b""),
            Err(ConfigError::EmptyPayload)
        ));
    }

    #[test]
    fn test_configure_from_malformed_bytes() {
        let mut config = ApiConfiguration::new();
        assert!(matches!(
            config.configure_from_bytes(b"this is = = not toml"),
            Err(ConfigError::MalformedPayload(_))
        ));
        // values must be strings
        assert!(matches!(
            config.configure_from_bytes(b"host = 42"),
            Err(ConfigError::MalformedPayload(_))
        ));
        assert!(matches!(
            config.configure_from_bytes(&[0xff, 0xfe, 0x00]),
            Err(ConfigError::MalformedPayload(_))
        ));
        assert!(!config.is_configured());
    }

    #[test]
    fn test_configure_from_non_file_location() {
        let mut config = ApiConfiguration::new();
        let location = Url::parse("https://example.com/keys.toml").unwrap();
        assert!(matches!(
            config.configure_from_location(&location),
            Err(ConfigError::NotAFileReference(url)) if url == "https://example.com/keys.toml"
        ));
    }

    #[test]
    fn test_configure_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ApiConfiguration::new();
        let result = config.configure_from_path(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_configure_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host = \"transloc.example\"").unwrap();
        writeln!(file, "apiKey = \"abc123\"").unwrap();

        let mut config = ApiConfiguration::new();
        let location = Url::from_file_path(file.path()).unwrap();
        config.configure_from_location(&location).unwrap();
        assert_eq!(config.host().unwrap(), "transloc.example");
    }

    #[test]
    fn test_scheme_defaults_to_https() {
        let mut config = ApiConfiguration::new();
        assert!(matches!(config.scheme(), Err(ConfigError::NotConfigured)));

        config.configure_from_map(sample_map());
        assert_eq!(config.scheme().unwrap(), "https");

        let mut values = sample_map();
        values.insert("scheme".to_string(), "http".to_string());
        config.configure_from_map(values);
        assert_eq!(config.scheme().unwrap(), "http");
    }

    #[test]
    fn test_debug_hides_values() {
        let config = ApiConfiguration::from_map(sample_map());
        let debug = format!("{config:?}");
        assert!(debug.contains("apiKey"));
        assert!(!debug.contains("\"k\""));
    }

    #[test]
    fn test_secret_value_debug_is_redacted() {
        let config = ApiConfiguration::from_map(HashMap::from([
            ("host".to_string(), "h".to_string()),
            ("apiKey".to_string(), "super-secret-key".to_string()),
        ]));
        let key = config.get(ConfigKey::ApiKey).unwrap();
        assert!(!format!("{key:?}").contains("super-secret-key"));
        assert_eq!(key.expose_secret(), "super-secret-key");
    }
}
