//! Write-side access to the payroll contract.

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use crate::blockchain::types::{BlockchainResult, ConfirmedTx};

/// Operations the orchestrator needs from the payroll contract.
///
/// `submit_*` return once the node has accepted the transaction;
/// [`PayrollChain::wait_for_confirmation`] blocks until it is final.
#[async_trait]
pub trait PayrollChain: Send + Sync {
    /// Address events must be emitted from to be trusted.
    fn contract_address(&self) -> Address;

    async fn submit_create_payroll(
        &self,
        payment_day: U256,
        duration: U256,
        expected_total_wei: U256,
    ) -> BlockchainResult<TxHash>;

    async fn submit_add_employee(
        &self,
        payroll_id: U256,
        employee: Address,
        monthly_wei: U256,
    ) -> BlockchainResult<TxHash>;

    /// Wait until `tx_hash` is mined with enough confirmations.
    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> BlockchainResult<ConfirmedTx>;

    /// Number of payrolls ever created.
    async fn payroll_counter(&self) -> BlockchainResult<U256>;
}
