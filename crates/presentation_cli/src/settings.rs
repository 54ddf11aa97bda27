//! Configuration loading for the CLI
//!
//! A configuration file wins over `--host`/`--api-key`; without either the
//! store stays unconfigured and the first lookup reports it.

use std::collections::HashMap;
use std::path::Path;

use integration_transloc::{ApiConfiguration, ConfigError, ConfigKey};
use tracing::debug;

/// Build the client configuration from the command-line sources
pub fn load_configuration(
    file: Option<&Path>,
    host: Option<String>,
    api_key: Option<String>,
) -> Result<ApiConfiguration, ConfigError> {
    let mut config = ApiConfiguration::new();

    if let Some(file) = file {
        debug!(path = %file.display(), "Loading configuration file");
        config.configure_from_path(file)?;
        return Ok(config);
    }

    let values: HashMap<String, String> = [(ConfigKey::Host, host), (ConfigKey::ApiKey, api_key)]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key.as_str().to_string(), value)))
        .collect();
    config.configure_from_map(values);
    Ok(config)
}
