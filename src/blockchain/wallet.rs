//! Signer key loading.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized, not even a prefix
//! - Format is checked before the key reaches the signer

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "PAYROLL_PRIVATE_KEY";

/// Legacy variable name accepted when [`PRIVATE_KEY_ENV_VAR`] is unset.
pub const FALLBACK_PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";

/// Length of a `0x`-prefixed 32-byte hex key.
const PRIVATE_KEY_LEN: usize = 66;

/// Employer signing key bound to one chain.
#[derive(Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
    chain_id: u64,
}

impl Wallet {
    /// Create a wallet from a `0x`-prefixed, 64 hex digit private key.
    pub fn from_private_key(private_key_hex: &str, chain_id: u64) -> BlockchainResult<Self> {
        check_key_format(private_key_hex)?;

        let signer: PrivateKeySigner = private_key_hex[2..]
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key: {}", e)))?;
        let signer = signer.with_chain_id(Some(chain_id));

        tracing::info!(
            address = %signer.address(),
            chain_id = chain_id,
            "Wallet initialized"
        );

        Ok(Self { signer, chain_id })
    }

    /// Read the key from the environment, preferring `PAYROLL_PRIVATE_KEY`.
    pub fn key_from_env() -> Option<String> {
        std::env::var(PRIVATE_KEY_ENV_VAR)
            .or_else(|_| std::env::var(FALLBACK_PRIVATE_KEY_ENV_VAR))
            .ok()
            .filter(|k| !k.trim().is_empty())
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Get the chain ID this wallet is configured for.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Network wallet for a signing provider.
    pub fn to_network_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.signer.address())
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

fn check_key_format(key: &str) -> BlockchainResult<()> {
    let well_formed = key.len() == PRIVATE_KEY_LEN
        && key.starts_with("0x")
        && key[2..].chars().all(|c| c.is_ascii_hexdigit());
    if well_formed {
        Ok(())
    } else {
        Err(BlockchainError::Configuration(format!(
            "Invalid private key format: expected 0x followed by 64 hex characters (got length {})",
            key.len()
        )))
    }
}
