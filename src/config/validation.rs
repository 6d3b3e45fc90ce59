//! Configuration validation.
//!
//! Returns all validation errors, not just the first. Runs after env
//! overrides so the checked values are the ones actually used.

use alloy::primitives::Address;
use std::net::SocketAddr;
use url::Url;

use crate::config::schema::PayrollChainConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with a config value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn validate_config(config: &PayrollChainConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut fail = |field: &'static str, message: String| errors.push(ValidationError { field, message });

    let chain = &config.blockchain;
    if chain.rpc_url.trim().is_empty() {
        fail("blockchain.rpc_url", "must not be empty".to_string());
    } else if Url::parse(&chain.rpc_url).is_err() {
        fail("blockchain.rpc_url", "is not a valid URL".to_string());
    }
    if chain.chain_id == 0 {
        fail("blockchain.chain_id", "must be greater than 0".to_string());
    }
    if chain.rpc_timeout_secs == 0 {
        fail("blockchain.rpc_timeout_secs", "must be greater than 0".to_string());
    }
    if chain.confirmation_blocks == 0 {
        fail("blockchain.confirmation_blocks", "must be at least 1".to_string());
    }
    if chain.confirmation_timeout_secs == 0 {
        fail("blockchain.confirmation_timeout_secs", "must be greater than 0".to_string());
    }
    if chain.poll_interval_ms == 0 {
        fail("blockchain.poll_interval_ms", "must be greater than 0".to_string());
    } else if chain.poll_interval_ms / 1000 >= chain.confirmation_timeout_secs.max(1) {
        fail(
            "blockchain.poll_interval_ms",
            "must be shorter than confirmation_timeout_secs".to_string(),
        );
    }

    let contracts = &config.contracts;
    if !contracts.payroll_address.is_empty() && contracts.payroll_address.parse::<Address>().is_err() {
        fail(
            "contracts.payroll_address",
            format!("'{}' is not a valid address", contracts.payroll_address),
        );
    }
    if contracts.ens_registry_address.parse::<Address>().is_err() {
        fail(
            "contracts.ens_registry_address",
            format!("'{}' is not a valid address", contracts.ens_registry_address),
        );
    }

    if let Some(url) = config.resolver.rpc_url.as_deref().filter(|u| !u.trim().is_empty()) {
        if Url::parse(url).is_err() {
            fail("resolver.rpc_url", "is not a valid URL".to_string());
        }
    }
    if config.resolver.chain_id == Some(0) {
        fail("resolver.chain_id", "must be greater than 0".to_string());
    }

    let obs = &config.observability;
    if !LOG_LEVELS.contains(&obs.log_level.to_ascii_lowercase().as_str()) {
        fail(
            "observability.log_level",
            format!("'{}' is not one of {}", obs.log_level, LOG_LEVELS.join(", ")),
        );
    }
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        fail(
            "observability.metrics_address",
            format!("'{}' is not a socket address", obs.metrics_address),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
