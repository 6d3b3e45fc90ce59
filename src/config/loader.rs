//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::PayrollChainConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides `blockchain.rpc_url`.
pub const RPC_URL_ENV_VAR: &str = "PAYROLL_RPC_URL";
/// Checked when [`RPC_URL_ENV_VAR`] is unset.
pub const FALLBACK_RPC_URL_ENV_VAR: &str = "RPC_URL";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Validation(_) => None,
        }
    }
}

/// Load, apply environment overrides and validate a TOML config file.
pub fn load_config(path: &Path) -> Result<PayrollChainConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: PayrollChainConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;
    finish(config)
}

/// Like [`load_config`], but starts from defaults when no path is given.
pub fn load_or_default(path: Option<&Path>) -> Result<PayrollChainConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => finish(PayrollChainConfig::default()),
    }
}

fn finish(mut config: PayrollChainConfig) -> Result<PayrollChainConfig, ConfigError> {
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut PayrollChainConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let rpc_url = [RPC_URL_ENV_VAR, FALLBACK_RPC_URL_ENV_VAR]
        .iter()
        .filter_map(|key| lookup(key))
        .find(|value| !value.trim().is_empty());

    if let Some(rpc_url) = rpc_url {
        config.blockchain.rpc_url = rpc_url.trim().to_string();
    }
}
