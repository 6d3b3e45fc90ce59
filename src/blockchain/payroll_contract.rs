//! Alloy-backed payroll contract access.

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use crate::blockchain::client::{ChainClientBundle, ReadClient};
use crate::blockchain::contracts::Payroll;
use crate::blockchain::transaction::{wait_for_confirmation, ConfirmationPolicy};
use crate::blockchain::types::{BlockchainResult, ConfirmedTx};
use crate::payroll::chain::PayrollChain;
use crate::payroll::claims::ClaimSchedule;

/// View calls against a payroll deployment. Needs no signer.
#[derive(Debug, Clone)]
pub struct PayrollReader {
    read: ReadClient,
    address: Address,
}

impl PayrollReader {
    pub fn new(read: ReadClient, address: Address) -> Self {
        Self { read, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn payroll_counter(&self) -> BlockchainResult<U256> {
        let contract = Payroll::new(self.address, self.read.provider().clone());
        let call = contract.payrollCounter();
        self.read.contract_call(call.call()).await
    }
}

#[async_trait]
impl ClaimSchedule for PayrollReader {
    async fn is_month_claimable(&self, payroll_id: U256, month: U256, year: U256) -> BlockchainResult<bool> {
        let contract = Payroll::new(self.address, self.read.provider().clone());
        let call = contract.isMonthClaimable(payroll_id, month, year);
        self.read.contract_call(call.call()).await
    }
}

/// Signing access to a payroll deployment for one orchestration run.
pub struct PayrollContract {
    bundle: ChainClientBundle,
    policy: ConfirmationPolicy,
    reader: PayrollReader,
}

impl PayrollContract {
    pub fn new(bundle: ChainClientBundle, address: Address, policy: ConfirmationPolicy) -> Self {
        let reader = PayrollReader::new(bundle.read().clone(), address);
        Self {
            bundle,
            policy,
            reader,
        }
    }

    pub fn signer_address(&self) -> Address {
        self.bundle.wallet().address()
    }

    fn contract(&self) -> Payroll::PayrollInstance<alloy::providers::DynProvider> {
        Payroll::new(self.reader.address(), self.bundle.signer().clone())
    }
}

#[async_trait]
impl PayrollChain for PayrollContract {
    fn contract_address(&self) -> Address {
        self.reader.address()
    }

    async fn submit_create_payroll(
        &self,
        payment_day: U256,
        duration: U256,
        expected_total_wei: U256,
    ) -> BlockchainResult<TxHash> {
        let contract = self.contract();
        let call = contract.createPayroll(payment_day, duration, expected_total_wei);
        let pending = self.bundle.read().contract_call(call.send()).await?;
        Ok(*pending.tx_hash())
    }

    async fn submit_add_employee(
        &self,
        payroll_id: U256,
        employee: Address,
        monthly_wei: U256,
    ) -> BlockchainResult<TxHash> {
        let contract = self.contract();
        let call = contract.addEmployee(payroll_id, employee, monthly_wei);
        let pending = self.bundle.read().contract_call(call.send()).await?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> BlockchainResult<ConfirmedTx> {
        wait_for_confirmation(self.bundle.read(), tx_hash, self.policy).await
    }

    async fn payroll_counter(&self) -> BlockchainResult<U256> {
        self.reader.payroll_counter().await
    }
}

impl std::fmt::Debug for PayrollContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayrollContract")
            .field("address", &self.reader.address())
            .field("signer", &self.signer_address())
            .field("policy", &self.policy)
            .finish()
    }
}
