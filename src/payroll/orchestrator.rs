//! Payroll run orchestration.
//!
//! # State machine
//! ```text
//! validate → create payroll → wait → extract id → (add employee → wait)* → complete
//! ```
//!
//! Every step waits for the previous one to be confirmed. Add-employee
//! transactions are sent one at a time from the same signer, so the account
//! nonce advances by exactly one per confirmed transaction. Nothing is
//! retried here and nothing already confirmed is rolled back.

use alloy::primitives::{Address, Log, TxHash, U256};
use alloy::sol_types::SolEvent;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use crate::blockchain::contracts::Payroll;
use crate::blockchain::types::{BlockchainError, ConfirmedTx};
use crate::observability::metrics;
use crate::payroll::chain::PayrollChain;
use crate::payroll::error::{OrchestrationError, RunStep};
use crate::payroll::types::{PayrollIdSource, PayrollRequest, PayrollResult, PreparedPayroll};

const STEP_CREATE: &str = "create_payroll";
const STEP_ADD: &str = "add_employee";

/// Drives one payroll request through the contract.
///
/// Owns its chain client; runs sharing a signer must not execute concurrently.
pub struct PayrollOrchestrator<C: PayrollChain> {
    chain: C,
}

impl<C: PayrollChain> PayrollOrchestrator<C> {
    pub fn new(chain: C) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    /// Execute a payroll request.
    ///
    /// On success exactly `employees.len() + 1` transactions were confirmed.
    pub async fn execute(&self, request: &PayrollRequest) -> Result<PayrollResult, OrchestrationError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("payroll_run", run_id = %run_id);

        let outcome = self.run(run_id, request).instrument(span).await;
        match &outcome {
            Ok(_) => metrics::record_run("completed"),
            Err(OrchestrationError::Validation(_)) => metrics::record_run("rejected"),
            Err(_) => metrics::record_run("failed"),
        }
        outcome
    }

    async fn run(&self, run_id: Uuid, request: &PayrollRequest) -> Result<PayrollResult, OrchestrationError> {
        let prepared = request.prepare().map_err(|e| {
            warn!(error = %e, "Payroll request rejected");
            e
        })?;

        info!(
            employer = %prepared.employer,
            employees = prepared.employees.len(),
            payment_day = %prepared.payment_day,
            duration = %prepared.duration,
            "Starting payroll run"
        );

        let created = self.create_payroll(&prepared).await?;
        let id_source = self.extract_payroll_id(&created).await?;
        let payroll_id = id_source.id();
        metrics::record_payroll_id_source(id_source.label());

        let employee_tx_hashes = self.add_employees(&prepared, payroll_id).await?;

        info!(
            payroll_id = %payroll_id,
            tx_hash = %created.tx_hash,
            employees = employee_tx_hashes.len(),
            "Payroll run complete"
        );

        Ok(PayrollResult {
            run_id,
            tx_hash: created.tx_hash,
            payroll_id,
            id_source,
            employee_tx_hashes,
        })
    }

    async fn create_payroll(&self, prepared: &PreparedPayroll) -> Result<ConfirmedTx, OrchestrationError> {
        let tx_hash = self
            .chain
            .submit_create_payroll(prepared.payment_day, prepared.duration, prepared.expected_total_wei)
            .await
            .map_err(|source| {
                metrics::record_transaction(STEP_CREATE, "error");
                OrchestrationError::CreatePayroll { source }
            })?;

        info!(tx_hash = %tx_hash, "Create payroll submitted");

        let confirmed = self
            .chain
            .wait_for_confirmation(tx_hash)
            .await
            .map_err(|source| {
                metrics::record_transaction(STEP_CREATE, outcome_label(&source));
                confirmation_error(RunStep::CreatePayroll, tx_hash, None, source, |source| {
                    OrchestrationError::CreatePayroll { source }
                })
            })?;

        metrics::record_transaction(STEP_CREATE, "confirmed");
        info!(tx_hash = %tx_hash, block = confirmed.block_number, "Create payroll confirmed");
        Ok(confirmed)
    }

    async fn extract_payroll_id(&self, created: &ConfirmedTx) -> Result<PayrollIdSource, OrchestrationError> {
        if let Some(id) = find_payroll_created(&created.logs, self.chain.contract_address()) {
            info!(payroll_id = %id, "Payroll id read from PayrollCreated event");
            return Ok(PayrollIdSource::EventFound { id });
        }

        // Correct only if no other payroll was created between our
        // transaction and this read.
        let counter = self.chain.payroll_counter().await.map_err(|e| {
            OrchestrationError::PayrollIdUnavailable {
                tx_hash: created.tx_hash,
                reason: format!("no PayrollCreated event and counter read failed: {}", e),
            }
        })?;
        let id = counter
            .checked_sub(U256::from(1))
            .ok_or_else(|| OrchestrationError::PayrollIdUnavailable {
                tx_hash: created.tx_hash,
                reason: "no PayrollCreated event and payroll counter is zero".to_string(),
            })?;

        warn!(
            payroll_id = %id,
            tx_hash = %created.tx_hash,
            "PayrollCreated event missing; payroll id derived from payrollCounter() - 1, \
             which is wrong if another payroll was created concurrently"
        );
        Ok(PayrollIdSource::FallbackUsed { id })
    }

    async fn add_employees(
        &self,
        prepared: &PreparedPayroll,
        payroll_id: U256,
    ) -> Result<Vec<TxHash>, OrchestrationError> {
        let mut hashes = Vec::with_capacity(prepared.employees.len());

        for (index, employee) in prepared.employees.iter().enumerate() {
            let failed = |source: BlockchainError| OrchestrationError::AddEmployee {
                index,
                name: employee.name.clone(),
                wallet: employee.wallet,
                payroll_id,
                completed: index,
                source,
            };

            let tx_hash = self
                .chain
                .submit_add_employee(payroll_id, employee.wallet, employee.monthly_wei)
                .await
                .map_err(|source| {
                    metrics::record_transaction(STEP_ADD, "error");
                    failed(source)
                })?;

            tracing::debug!(index, wallet = %employee.wallet, tx_hash = %tx_hash, "Add employee submitted");

            self.chain
                .wait_for_confirmation(tx_hash)
                .await
                .map_err(|source| {
                    metrics::record_transaction(STEP_ADD, outcome_label(&source));
                    confirmation_error(RunStep::AddEmployee { index }, tx_hash, Some(payroll_id), source, failed)
                })?;

            metrics::record_transaction(STEP_ADD, "confirmed");
            info!(
                index,
                name = %employee.name,
                wallet = %employee.wallet,
                tx_hash = %tx_hash,
                "Employee added"
            );
            hashes.push(tx_hash);
        }

        Ok(hashes)
    }
}

/// First `PayrollCreated` event emitted by `contract` among `logs`.
///
/// Logs from other addresses or with a different signature are skipped.
pub fn find_payroll_created(logs: &[Log], contract: Address) -> Option<U256> {
    logs.iter()
        .filter(|log| log.address == contract)
        .find_map(|log| Payroll::PayrollCreated::decode_log_data(&log.data).ok())
        .map(|event| event.payrollId)
}

/// A timeout keeps its own variant; everything else goes through `other`.
fn confirmation_error(
    step: RunStep,
    tx_hash: TxHash,
    payroll_id: Option<U256>,
    source: BlockchainError,
    other: impl FnOnce(BlockchainError) -> OrchestrationError,
) -> OrchestrationError {
    match source {
        BlockchainError::Timeout { waited_secs, .. } => {
            warn!(step = %step, tx_hash = %tx_hash, waited_secs, "Confirmation timed out; transaction may still be mined");
            OrchestrationError::ConfirmationTimeout {
                step,
                tx_hash,
                waited_secs,
                payroll_id,
            }
        }
        source => other(source),
    }
}

fn outcome_label(error: &BlockchainError) -> &'static str {
    match error {
        BlockchainError::Timeout { .. } => "timeout",
        BlockchainError::Reverted(_) | BlockchainError::Contract(_) => "reverted",
        _ => "error",
    }
}
