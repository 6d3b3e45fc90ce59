//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every section has defaults, so an empty file is a valid config for
//! Arbitrum Sepolia.

use serde::{Deserialize, Serialize};

/// Public Arbitrum Sepolia endpoint.
pub const DEFAULT_RPC_URL: &str = "https://sepolia-rollup.arbitrum.io/rpc";
pub const DEFAULT_CHAIN_ID: u64 = 421614;
/// ENS registry, same address on mainnet and the public testnets.
pub const DEFAULT_ENS_REGISTRY: &str = "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e";

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PayrollChainConfig {
    /// Network the payroll contract lives on.
    pub blockchain: BlockchainConfig,

    /// Deployed contract addresses.
    pub contracts: ContractsConfig,

    /// Name resolution endpoint.
    pub resolver: ResolverConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL. Overridden by `PAYROLL_RPC_URL`.
    pub rpc_url: String,

    /// Chain ID the endpoint must report.
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations required for finality.
    pub confirmation_blocks: u32,

    /// Upper bound on one confirmation wait, in seconds.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            confirmation_timeout_secs: 120,
            poll_interval_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractsConfig {
    /// Payroll contract address. Required for `execute` and `claimable`.
    pub payroll_address: String,

    /// ENS registry address on the resolver's network.
    pub ens_registry_address: String,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            payroll_address: String::new(),
            ens_registry_address: DEFAULT_ENS_REGISTRY.to_string(),
        }
    }
}

/// Names usually live on mainnet while payroll runs on an L2, so
/// resolution may use its own endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ResolverConfig {
    /// Falls back to `blockchain.rpc_url` when unset.
    pub rpc_url: Option<String>,

    /// Chain ID the resolver endpoint must report, if checked.
    pub chain_id: Option<u64>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

impl PayrollChainConfig {
    /// Endpoint used for name resolution.
    pub fn resolver_rpc_url(&self) -> &str {
        self.resolver
            .rpc_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(&self.blockchain.rpc_url)
    }
}
