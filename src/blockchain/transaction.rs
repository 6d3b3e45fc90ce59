//! Confirmation monitoring.
//!
//! # Responsibilities
//! - Poll for the receipt of a submitted transaction
//! - Enforce the configured confirmation depth
//! - Bound the whole wait so callers get a distinguishable timeout
//!
//! No retries or replacement here: a timed-out transaction may still be
//! mined, and deciding what to do about it belongs to the caller.

use alloy::primitives::TxHash;
use std::time::Duration;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::blockchain::client::ReadClient;
use crate::blockchain::types::{
    BlockchainConfig, BlockchainError, BlockchainResult, ConfirmationStatus, ConfirmedTx,
};

/// How long and how deep to wait for a transaction.
#[derive(Debug, Clone, Copy)]
pub struct ConfirmationPolicy {
    pub confirmations: u32,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl ConfirmationPolicy {
    pub fn from_config(config: &BlockchainConfig) -> Self {
        Self {
            confirmations: config.confirmation_blocks.max(1),
            timeout: Duration::from_secs(config.confirmation_timeout_secs),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }
}

/// Wait for a transaction to be confirmed.
///
/// Returns `Reverted` for a mined failure and `Timeout` when the bound
/// elapses; the two are never conflated. Poll failures are retried until
/// the bound, so an unreachable node also ends in `Timeout`.
pub async fn wait_for_confirmation(
    client: &ReadClient,
    tx_hash: TxHash,
    policy: ConfirmationPolicy,
) -> BlockchainResult<ConfirmedTx> {
    let result = timeout(policy.timeout, async {
        let mut ticker = interval(policy.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let receipt = match client.get_transaction_receipt(tx_hash).await {
                Ok(Some(r)) => r,
                Ok(None) => {
                    tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                    continue;
                }
                // The transaction is already broadcast, so a failed poll says
                // nothing about its fate; the outer bound decides.
                Err(e) => {
                    tracing::warn!(tx_hash = %tx_hash, error = %e, "Receipt poll failed");
                    continue;
                }
            };

            if !receipt.status() {
                return Err(BlockchainError::Reverted(tx_hash));
            }

            let head = match client.get_block_number().await {
                Ok(head) => head,
                Err(e) => {
                    tracing::warn!(tx_hash = %tx_hash, error = %e, "Block number poll failed");
                    continue;
                }
            };
            let tx_block = receipt.block_number.unwrap_or(head);

            match ConfirmationStatus::from_depth(tx_block, head, policy.confirmations) {
                ConfirmationStatus::Confirmed { block_number } => {
                    let logs = receipt
                        .inner
                        .logs()
                        .iter()
                        .map(|log| log.inner.clone())
                        .collect();
                    return Ok(ConfirmedTx {
                        tx_hash,
                        block_number,
                        logs,
                    });
                }
                ConfirmationStatus::Confirming { current, required } => {
                    tracing::debug!(
                        tx_hash = %tx_hash,
                        confirmations = current,
                        required = required,
                        "Waiting for confirmations"
                    );
                }
            }
        }
    })
    .await;

    match result {
        Ok(outcome) => outcome,
        Err(_) => Err(BlockchainError::Timeout {
            tx_hash,
            waited_secs: policy.timeout.as_secs(),
        }),
    }
}
