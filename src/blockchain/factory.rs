//! Chain client construction.
//!
//! Validates the endpoint and key before any network traffic, then probes
//! the endpoint once so a dead or mistyped RPC URL fails fast with a
//! diagnosable (masked) message.

use alloy::providers::{Provider, ProviderBuilder};
use std::time::Duration;
use url::Url;

use crate::blockchain::client::{ChainClientBundle, ReadClient};
use crate::blockchain::redact::{mask_rpc_url, RedactedUrl};
use crate::blockchain::types::{BlockchainConfig, BlockchainError, BlockchainResult};
use crate::blockchain::wallet::Wallet;

/// Tokens left in template `.env` files when nobody filled in the API key.
pub const RPC_URL_PLACEHOLDERS: &[&str] =
    &["YOUR_ALCHEMY_API_KEY", "YOUR_API_KEY", "YOUR_PROJECT_ID"];

/// Builds clients bound to one configured network.
#[derive(Debug, Clone)]
pub struct ChainClientFactory {
    config: BlockchainConfig,
}

impl ChainClientFactory {
    pub fn new(config: BlockchainConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }

    /// Build the read and signing clients for one orchestration run.
    pub async fn connect(&self, private_key: Option<&str>) -> BlockchainResult<ChainClientBundle> {
        let url = check_rpc_url(Some(self.config.rpc_url.as_str()))?;
        let private_key = private_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| BlockchainError::Configuration("Missing signer private key".to_string()))?;
        let wallet = Wallet::from_private_key(private_key, self.config.chain_id)?;

        let read = self.connect_read_only(url.clone()).await?;

        let signer = ProviderBuilder::new()
            .wallet(wallet.to_network_wallet())
            .connect_http(url)
            .erased();

        tracing::info!(
            rpc_url = %read.masked_url(),
            chain_id = self.config.chain_id,
            signer = %wallet.address(),
            "Chain clients initialized"
        );

        Ok(ChainClientBundle::new(
            read,
            signer,
            wallet,
            self.config.chain_id.into(),
        ))
    }

    /// Build a probed read-only client against an arbitrary endpoint.
    ///
    /// Used for name resolution, which usually runs against a different
    /// network than the payroll contract.
    pub async fn read_client(
        &self,
        rpc_url: &str,
        expected_chain_id: Option<u64>,
    ) -> BlockchainResult<ReadClient> {
        let url = check_rpc_url(Some(rpc_url))?;
        let (client, actual) = self.probe(url).await?;
        match expected_chain_id {
            Some(expected) if expected != actual => {
                Err(BlockchainError::ChainMismatch { expected, actual })
            }
            _ => Ok(client),
        }
    }

    async fn connect_read_only(&self, url: Url) -> BlockchainResult<ReadClient> {
        let (client, actual) = self.probe(url).await?;
        if actual != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual,
            });
        }
        Ok(client)
    }

    /// Liveness probe: one `eth_chainId` call.
    async fn probe(&self, url: Url) -> BlockchainResult<(ReadClient, u64)> {
        let endpoint = RedactedUrl::new(url.as_str());
        let masked_url = endpoint.masked().to_string();
        let provider = ProviderBuilder::new().connect_http(url).erased();
        let client = ReadClient::new(
            provider,
            endpoint,
            Duration::from_secs(self.config.rpc_timeout_secs),
        );

        match client.get_chain_id().await {
            Ok(chain_id) => {
                tracing::debug!(rpc_url = %masked_url, chain_id = chain_id.0, "RPC endpoint reachable");
                Ok((client, chain_id.0))
            }
            Err(BlockchainError::Connectivity { rpc_url, message }) => {
                Err(BlockchainError::Connectivity {
                    rpc_url,
                    message: format!(
                        "{}. The RPC URL may be invalid or require authentication",
                        message
                    ),
                })
            }
            Err(BlockchainError::RpcTimeout(secs)) => Err(BlockchainError::Connectivity {
                rpc_url: masked_url,
                message: format!("no response within {} seconds", secs),
            }),
            Err(BlockchainError::Rpc(message)) => Err(BlockchainError::Connectivity {
                rpc_url: masked_url,
                message,
            }),
            Err(other) => Err(other),
        }
    }
}

/// Check presence, placeholders and syntax of an RPC URL.
pub fn check_rpc_url(rpc_url: Option<&str>) -> BlockchainResult<Url> {
    let raw = rpc_url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| BlockchainError::Configuration("Missing RPC URL".to_string()))?;

    if RPC_URL_PLACEHOLDERS.iter().any(|p| raw.contains(p)) {
        return Err(BlockchainError::Configuration(format!(
            "Invalid RPC URL: replace the placeholder with an actual API key (current URL: {})",
            mask_rpc_url(raw)
        )));
    }

    raw.parse().map_err(|e| {
        BlockchainError::Configuration(format!("Invalid RPC URL '{}': {}", mask_rpc_url(raw), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::ErrorKind;

    const TEST_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_missing_rpc_url() {
        let err = check_rpc_url(None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(check_rpc_url(Some("  ")).is_err());
    }

    #[test]
    fn test_placeholder_rpc_url_rejected() {
        let err = check_rpc_url(Some("https://arb-sepolia.g.alchemy.com/v2/YOUR_ALCHEMY_API_KEY"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        let msg = err.to_string();
        assert!(msg.contains("placeholder"));
        assert!(msg.contains("/v2/***"));
    }

    #[test]
    fn test_valid_rpc_url_accepted() {
        let url = check_rpc_url(Some("http://localhost:8545")).unwrap();
        assert_eq!(url.port(), Some(8545));
    }

    #[tokio::test]
    async fn test_connect_without_key_fails_before_network() {
        let factory = ChainClientFactory::new(BlockchainConfig::default());
        let err = factory.connect(None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_connect_with_malformed_key_fails_before_network() {
        let mut config = BlockchainConfig::default();
        // Unroutable; a network attempt would surface as connectivity instead.
        config.rpc_url = "http://127.0.0.1:9".to_string();
        let factory = ChainClientFactory::new(config);
        let err = factory.connect(Some(&TEST_PRIVATE_KEY[2..])).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_connect_to_dead_endpoint_reports_masked_url() {
        let mut config = BlockchainConfig::default();
        config.rpc_url = "http://127.0.0.1:9/v2/supersecretkey".to_string();
        config.rpc_timeout_secs = 2;
        let factory = ChainClientFactory::new(config);
        let err = factory.connect(Some(TEST_PRIVATE_KEY)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connectivity);
        let msg = err.to_string();
        assert!(msg.contains("/v2/***"));
        assert!(!msg.contains("supersecretkey"));
    }
}
