//! Two-hop name resolution: registry → resolver → address.

use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ErrorKind};
use crate::observability::metrics;
use crate::resolver::classify::{classify, namehash, validate_domain_name, Classification};

/// Read-only access to the name registry and its resolvers.
#[async_trait]
pub trait NameLookup: Send + Sync {
    /// Resolver contract bound to `node` in the registry (zero if unset).
    async fn resolver_of(&self, node: B256) -> BlockchainResult<Address>;

    /// Address record for `node` on `resolver` (zero if unset).
    async fn address_of(&self, resolver: Address, node: B256) -> BlockchainResult<Address>;
}

/// Outcome of a successful lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "address", rename_all = "snake_case")]
pub enum Resolution {
    Found(Address),
    /// Unregistered, no resolver configured, or no address record.
    NotFound,
}

impl Resolution {
    pub fn address(&self) -> Option<Address> {
        match self {
            Resolution::Found(address) => Some(*address),
            Resolution::NotFound => None,
        }
    }
}

/// Which hop of the lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStage {
    Registry,
    Resolver,
}

impl std::fmt::Display for LookupStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupStage::Registry => write!(f, "registry"),
            LookupStage::Resolver => write!(f, "resolver"),
        }
    }
}

/// A lookup that failed for transport or revert reasons.
///
/// Distinct from [`Resolution::NotFound`], which is a valid answer.
#[derive(Debug, Error)]
#[error("failed to resolve '{name}' during {stage} lookup: {source}")]
pub struct ResolutionError {
    pub name: String,
    pub stage: LookupStage,
    #[source]
    pub source: BlockchainError,
}

impl ResolutionError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Resolution
    }
}

/// Errors from [`NameResolver::resolve`].
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Rejected before any network call.
    #[error("invalid input '{input}': {reason}")]
    Invalid { input: String, reason: String },

    #[error(transparent)]
    Lookup(#[from] ResolutionError),
}

impl ResolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::Invalid { .. } => ErrorKind::Validation,
            ResolveError::Lookup(e) => e.kind(),
        }
    }
}

/// Resolves addresses and domain names.
///
/// Cheap to clone; clones share the underlying read-only lookup.
#[derive(Clone)]
pub struct NameResolver {
    lookup: Arc<dyn NameLookup>,
}

impl NameResolver {
    pub fn new(lookup: Arc<dyn NameLookup>) -> Self {
        Self { lookup }
    }

    /// Resolve any input: address literals pass through without a network
    /// call, names are syntax-checked and then looked up.
    pub async fn resolve(&self, input: &str) -> Result<Resolution, ResolveError> {
        match classify(input) {
            Classification::Address(address) => Ok(Resolution::Found(address)),
            Classification::DomainName(name) => {
                let normalized =
                    validate_domain_name(&name).map_err(|reason| ResolveError::Invalid {
                        input: input.to_string(),
                        reason: reason.to_string(),
                    })?;
                Ok(self.resolve_name(&normalized).await?)
            }
            Classification::Invalid => Err(ResolveError::Invalid {
                input: input.to_string(),
                reason: "not an address or domain name".to_string(),
            }),
        }
    }

    /// Look up an already-normalized domain name.
    pub async fn resolve_name(&self, name: &str) -> Result<Resolution, ResolutionError> {
        let node = namehash(name);

        let resolver = self.lookup.resolver_of(node).await.map_err(|source| {
            metrics::record_name_resolution("error");
            ResolutionError {
                name: name.to_string(),
                stage: LookupStage::Registry,
                source,
            }
        })?;

        if resolver == Address::ZERO {
            tracing::debug!(name = %name, "No resolver configured");
            metrics::record_name_resolution("not_found");
            return Ok(Resolution::NotFound);
        }

        let address = self
            .lookup
            .address_of(resolver, node)
            .await
            .map_err(|source| {
                metrics::record_name_resolution("error");
                ResolutionError {
                    name: name.to_string(),
                    stage: LookupStage::Resolver,
                    source,
                }
            })?;

        if address == Address::ZERO {
            tracing::debug!(name = %name, resolver = %resolver, "Resolver has no address record");
            metrics::record_name_resolution("not_found");
            return Ok(Resolution::NotFound);
        }

        tracing::debug!(name = %name, address = %address, "Name resolved");
        metrics::record_name_resolution("found");
        Ok(Resolution::Found(address))
    }
}

impl std::fmt::Debug for NameResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameResolver").finish_non_exhaustive()
    }
}
