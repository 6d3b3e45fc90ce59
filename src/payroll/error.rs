//! Payroll error types.

use alloy::primitives::{Address, TxHash, U256};
use thiserror::Error;

use crate::blockchain::types::{BlockchainError, ErrorKind};
use crate::payroll::amount::AmountError;

/// A request rejected before any chain interaction.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("employee list is empty")]
    NoEmployees,

    #[error("missing employer address")]
    MissingEmployer,

    #[error("employer address '{0}' is not a valid address")]
    InvalidEmployer(String),

    #[error("payment day {0} is outside 1-31")]
    PaymentDay(u32),

    #[error("duration {0} months is outside 1-60")]
    Duration(u32),

    #[error("expected total amount: {0}")]
    TotalAmount(#[source] AmountError),

    #[error("employee #{index} ({name}): wallet '{wallet}' is not a resolved address")]
    UnresolvedWallet {
        index: usize,
        name: String,
        wallet: String,
    },

    #[error("employee #{index} ({name}): {source}")]
    EmployeeAmount {
        index: usize,
        name: String,
        #[source]
        source: AmountError,
    },

    #[error("employee #{index} ({name}): amount must be greater than zero")]
    ZeroAmount { index: usize, name: String },
}

/// Step of a run, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStep {
    CreatePayroll,
    AddEmployee { index: usize },
}

impl std::fmt::Display for RunStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStep::CreatePayroll => write!(f, "create payroll"),
            RunStep::AddEmployee { index } => write!(f, "add employee #{}", index),
        }
    }
}

/// A run that stopped before completion.
///
/// Chain state committed before the failure stays committed; the variants
/// carry what the caller needs to know about it.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    /// Nothing was submitted.
    #[error("invalid payroll request: {0}")]
    Validation(#[from] RequestError),

    /// Submission rejected or the creation transaction reverted. No employees added.
    #[error("create payroll failed: {source}")]
    CreatePayroll {
        #[source]
        source: BlockchainError,
    },

    /// Confirmation wait expired. The transaction may still be mined.
    #[error("{step} transaction {tx_hash} not confirmed within {waited_secs}s; it may still be mined")]
    ConfirmationTimeout {
        step: RunStep,
        tx_hash: TxHash,
        waited_secs: u64,
        /// Set when the payroll itself was already confirmed.
        payroll_id: Option<U256>,
    },

    /// The payroll exists on-chain but its id could not be recovered.
    #[error("payroll created in {tx_hash} but its id could not be determined: {reason}")]
    PayrollIdUnavailable { tx_hash: TxHash, reason: String },

    /// Employees before `index` are already on-chain.
    #[error(
        "adding employee #{index} ({name}, {wallet}) to payroll {payroll_id} failed \
         after {completed} confirmed additions: {source}"
    )]
    AddEmployee {
        index: usize,
        name: String,
        wallet: Address,
        payroll_id: U256,
        completed: usize,
        #[source]
        source: BlockchainError,
    },
}

impl OrchestrationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrchestrationError::Validation(_) => ErrorKind::Validation,
            OrchestrationError::ConfirmationTimeout { .. } => ErrorKind::Timeout,
            OrchestrationError::CreatePayroll { source }
            | OrchestrationError::AddEmployee { source, .. } => match source.kind() {
                ErrorKind::Connectivity => ErrorKind::Connectivity,
                _ => ErrorKind::Orchestration,
            },
            OrchestrationError::PayrollIdUnavailable { .. } => ErrorKind::Orchestration,
        }
    }

    /// Payroll id already confirmed on-chain when the run stopped, if any.
    pub fn confirmed_payroll_id(&self) -> Option<U256> {
        match self {
            OrchestrationError::AddEmployee { payroll_id, .. } => Some(*payroll_id),
            OrchestrationError::ConfirmationTimeout { payroll_id, .. } => *payroll_id,
            _ => None,
        }
    }
}
