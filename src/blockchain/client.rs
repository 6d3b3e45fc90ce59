//! RPC clients with timeout and error handling.
//!
//! # Responsibilities
//! - Wrap read-only JSON-RPC calls with a per-request deadline
//! - Classify transport failures (connectivity) apart from node error responses
//! - Bundle the read and signing providers owned by one orchestration run

use alloy::primitives::TxHash;
use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::TransactionReceipt;
use alloy::sol_types::{Revert, SolError};
use alloy::transports::TransportError;
use std::future::IntoFuture;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::redact::RedactedUrl;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId, RevertKind};
use crate::blockchain::wallet::Wallet;

/// Read-only RPC client.
///
/// Holds no signer, so it can be cloned and shared freely between
/// concurrent name resolutions.
#[derive(Clone)]
pub struct ReadClient {
    provider: DynProvider,
    endpoint: RedactedUrl,
    timeout_duration: Duration,
}

impl ReadClient {
    pub fn new(provider: DynProvider, endpoint: RedactedUrl, timeout_duration: Duration) -> Self {
        Self {
            provider,
            endpoint,
            timeout_duration,
        }
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.call(self.provider.get_chain_id()).await.map(ChainId)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.call(self.provider.get_block_number()).await
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        self.call(self.provider.get_transaction_receipt(tx_hash)).await
    }

    /// Run an RPC future under the configured deadline.
    pub async fn call<T, F>(&self, fut: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = Result<T, TransportError>>,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(self.classify_transport_error(e)),
            Err(_) => Err(BlockchainError::RpcTimeout(self.timeout_duration.as_secs())),
        }
    }

    /// Run a contract call under the configured deadline.
    pub async fn contract_call<T, F>(&self, fut: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = Result<T, alloy::contract::Error>>,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(self.classify_contract_error(e)),
            Err(_) => Err(BlockchainError::RpcTimeout(self.timeout_duration.as_secs())),
        }
    }

    /// Reverts become [`BlockchainError::Contract`]; the rest follows the
    /// transport classification.
    pub fn classify_contract_error(&self, err: alloy::contract::Error) -> BlockchainError {
        if let Some(data) = err.as_revert_data() {
            let reason = Revert::abi_decode(&data)
                .map(|revert| revert.reason)
                .unwrap_or_else(|_| format!("custom error {}", data));
            return BlockchainError::Contract(RevertKind::classify(&reason));
        }
        match err {
            alloy::contract::Error::TransportError(e) => self.classify_transport_error(e),
            other => BlockchainError::Rpc(self.endpoint.scrub(&other.to_string())),
        }
    }

    /// Node error responses stay `Rpc`; everything below JSON-RPC is connectivity.
    pub fn classify_transport_error(&self, err: TransportError) -> BlockchainError {
        let message = self.endpoint.scrub(&err.to_string());
        if err.is_error_resp() {
            BlockchainError::Rpc(message)
        } else {
            BlockchainError::Connectivity {
                rpc_url: self.endpoint.masked().to_string(),
                message,
            }
        }
    }

    /// Get the underlying provider.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Endpoint with secret path segments replaced.
    pub fn masked_url(&self) -> &str {
        self.endpoint.masked()
    }

    pub fn endpoint(&self) -> &RedactedUrl {
        &self.endpoint
    }

    pub fn timeout_duration(&self) -> Duration {
        self.timeout_duration
    }
}

impl std::fmt::Debug for ReadClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadClient")
            .field("rpc_url", &self.endpoint)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}

/// Read client, signing client and chain identity for one orchestration run.
///
/// Deliberately not `Clone`: the signing provider must not be shared by two
/// runs, or their nonces would race.
pub struct ChainClientBundle {
    read: ReadClient,
    signer: DynProvider,
    wallet: Wallet,
    chain_id: ChainId,
}

impl ChainClientBundle {
    pub fn new(read: ReadClient, signer: DynProvider, wallet: Wallet, chain_id: ChainId) -> Self {
        Self {
            read,
            signer,
            wallet,
            chain_id,
        }
    }

    pub fn read(&self) -> &ReadClient {
        &self.read
    }

    pub fn signer(&self) -> &DynProvider {
        &self.signer
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }
}

impl std::fmt::Debug for ChainClientBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClientBundle")
            .field("rpc_url", &self.read.endpoint)
            .field("signer", &self.wallet.address())
            .field("chain_id", &self.chain_id.0)
            .finish()
    }
}
