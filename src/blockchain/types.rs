//! Chain-specific types and error definitions.

use alloy::primitives::{Log, TxHash};
use serde::Serialize;
use thiserror::Error;

pub use crate::config::schema::BlockchainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Coarse classification shared by every error this crate surfaces.
///
/// Callers branch on this instead of matching message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Connectivity,
    Validation,
    Resolution,
    Orchestration,
    Timeout,
}

/// Reason a contract call was rejected, decoded from the revert string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum RevertKind {
    NotEligible,
    AlreadyClaimed,
    NotClaimable,
    InsufficientBalance,
    UserRejected,
    Other(String),
}

impl RevertKind {
    /// Map a raw revert reason onto a known contract failure.
    pub fn classify(reason: &str) -> Self {
        let lower = reason.to_ascii_lowercase();
        if lower.contains("not eligible") {
            RevertKind::NotEligible
        } else if lower.contains("already claimed") {
            RevertKind::AlreadyClaimed
        } else if lower.contains("not claimable") {
            RevertKind::NotClaimable
        } else if lower.contains("insufficient contract balance") {
            RevertKind::InsufficientBalance
        } else if lower.contains("user rejected") {
            RevertKind::UserRejected
        } else {
            RevertKind::Other(reason.to_string())
        }
    }
}

impl std::fmt::Display for RevertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RevertKind::NotEligible => write!(f, "caller is not eligible for this payroll"),
            RevertKind::AlreadyClaimed => write!(f, "month already claimed"),
            RevertKind::NotClaimable => write!(f, "month is not yet claimable"),
            RevertKind::InsufficientBalance => write!(f, "insufficient contract balance"),
            RevertKind::UserRejected => write!(f, "transaction rejected by signer"),
            RevertKind::Other(reason) => write!(f, "{}", reason),
        }
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Endpoint, key or contract configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The liveness probe or an RPC call failed below the contract layer.
    /// `rpc_url` is always masked.
    #[error("Failed to connect to RPC endpoint {rpc_url}: {message}")]
    Connectivity { rpc_url: String, message: String },

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// A single RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    RpcTimeout(u64),

    /// Transaction was not confirmed within the wait bound. It may still land.
    #[error("Transaction {tx_hash} not confirmed within {waited_secs} seconds; it may still be mined")]
    Timeout { tx_hash: TxHash, waited_secs: u64 },

    /// Transaction was mined but its execution reverted.
    #[error("Transaction {0} reverted")]
    Reverted(TxHash),

    /// Contract call rejected before inclusion (estimation or eth_call revert).
    #[error("Contract rejected call: {0}")]
    Contract(RevertKind),

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

impl BlockchainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BlockchainError::Configuration(_) | BlockchainError::Wallet(_) => ErrorKind::Configuration,
            BlockchainError::Connectivity { .. }
            | BlockchainError::Rpc(_)
            | BlockchainError::RpcTimeout(_)
            | BlockchainError::ChainMismatch { .. } => ErrorKind::Connectivity,
            BlockchainError::Timeout { .. } => ErrorKind::Timeout,
            BlockchainError::Reverted(_) | BlockchainError::Contract(_) => ErrorKind::Orchestration,
        }
    }

    /// Whether the failure leaves the transaction outcome unknown.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, BlockchainError::Timeout { .. })
    }
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// A transaction that reached the configured confirmation depth with a
/// successful status.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedTx {
    pub tx_hash: TxHash,
    pub block_number: u64,
    /// Logs emitted by the transaction, in receipt order.
    pub logs: Vec<Log>,
}

/// Transaction confirmation status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Transaction has been mined but not enough confirmations.
    Confirming { current: u32, required: u32 },
    /// Transaction is confirmed with required block depth.
    Confirmed { block_number: u64 },
}

impl ConfirmationStatus {
    /// Status of a mined transaction given its inclusion block and the chain head.
    ///
    /// Inclusion counts as the first confirmation.
    pub fn from_depth(tx_block: u64, head: u64, required: u32) -> Self {
        let current = head.saturating_sub(tx_block).saturating_add(1).min(u32::MAX as u64) as u32;
        if current >= required {
            ConfirmationStatus::Confirmed {
                block_number: tx_block,
            }
        } else {
            ConfirmationStatus::Confirming { current, required }
        }
    }
}
