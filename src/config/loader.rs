//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::EchoConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the listening port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable holding the listening interface.
pub const HOST_ENV: &str = "HOST";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment variable {var}=`{value}` is not a valid port")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Parse a TOML configuration file.
pub fn read_config_file(path: &Path) -> Result<EchoConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply `PORT` and `HOST` from the environment.
///
/// `lookup` abstracts `std::env::var` so tests do not touch process state.
pub fn apply_env_overrides<F>(config: &mut EchoConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // Empty values count as unset.
    let lookup = |key: &str| lookup(key).filter(|value: &String| !value.trim().is_empty());

    if let Some(value) = lookup(PORT_ENV) {
        config.listener.port = value.trim().parse().map_err(|_| ConfigError::Env {
            var: PORT_ENV,
            value: value.clone(),
        })?;
    }
    if let Some(host) = lookup(HOST_ENV) {
        config.listener.host = host.trim().to_owned();
    }
    Ok(())
}

/// Build the effective configuration: defaults, then the optional file, then
/// the environment, then command-line overrides. The result is validated.
pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<EchoConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => EchoConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    if let Some(host) = &overrides.host {
        config.listener.host = host.clone();
    }
    if let Some(port) = overrides.port {
        config.listener.port = port;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
