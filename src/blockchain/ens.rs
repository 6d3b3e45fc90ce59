//! Name registry lookups over RPC.

use alloy::primitives::{Address, B256};
use async_trait::async_trait;

use crate::blockchain::client::ReadClient;
use crate::blockchain::contracts::{ENSRegistry, ENSResolver};
use crate::blockchain::types::BlockchainResult;
use crate::resolver::NameLookup;

/// [`NameLookup`] backed by an ENS registry deployment.
#[derive(Debug, Clone)]
pub struct EnsRegistryLookup {
    client: ReadClient,
    registry: Address,
}

impl EnsRegistryLookup {
    pub fn new(client: ReadClient, registry: Address) -> Self {
        Self { client, registry }
    }
}

#[async_trait]
impl NameLookup for EnsRegistryLookup {
    async fn resolver_of(&self, node: B256) -> BlockchainResult<Address> {
        let registry = ENSRegistry::new(self.registry, self.client.provider().clone());
        let call = registry.resolver(node);
        self.client.contract_call(call.call()).await
    }

    async fn address_of(&self, resolver: Address, node: B256) -> BlockchainResult<Address> {
        let resolver = ENSResolver::new(resolver, self.client.provider().clone());
        let call = resolver.addr(node);
        self.client.contract_call(call.call()).await
    }
}
