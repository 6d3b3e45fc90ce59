//! Per-input validation result for form and CLI callers.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::resolver::classify::{classify, validate_domain_name, Classification};
use crate::resolver::name_resolver::{NameResolver, Resolution, ResolutionError};

/// Result of validating one address or domain input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub address: Option<Address>,
    pub is_domain_name: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    fn valid(address: Address, is_domain_name: bool) -> Self {
        Self {
            is_valid: true,
            address: Some(address),
            is_domain_name,
            error: None,
        }
    }

    fn invalid(is_domain_name: bool, error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            address: None,
            is_domain_name,
            error: Some(error.into()),
        }
    }
}

/// Validate an input and resolve it if it is a domain name.
///
/// Without a resolver, domain names come back invalid instead of being
/// looked up. Lookup failures propagate as [`ResolutionError`].
pub async fn validate_and_resolve(
    input: &str,
    resolver: Option<&NameResolver>,
) -> Result<ValidationResult, ResolutionError> {
    if input.trim().is_empty() {
        return Ok(ValidationResult::invalid(false, "Empty input"));
    }

    match classify(input) {
        Classification::Address(address) => Ok(ValidationResult::valid(address, false)),
        Classification::DomainName(name) => {
            let normalized = match validate_domain_name(&name) {
                Ok(n) => n,
                Err(reason) => return Ok(ValidationResult::invalid(true, reason.to_string())),
            };
            let Some(resolver) = resolver else {
                return Ok(ValidationResult::invalid(
                    true,
                    "Name resolution client not available",
                ));
            };
            match resolver.resolve_name(&normalized).await? {
                Resolution::Found(address) => Ok(ValidationResult::valid(address, true)),
                Resolution::NotFound => Ok(ValidationResult::invalid(
                    true,
                    "Domain not found or not resolvable",
                )),
            }
        }
        Classification::Invalid => Ok(ValidationResult::invalid(
            false,
            "Invalid address or domain name",
        )),
    }
}
