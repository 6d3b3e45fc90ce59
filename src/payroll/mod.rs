//! Payroll execution subsystem.
//!
//! # Data Flow
//! ```text
//! PayrollRequest (JSON)
//!     → wallets.rs (domain names → addresses)
//!     → types.rs (bounds, addresses, amounts → PreparedPayroll)
//!     → orchestrator.rs (create → id → add employees, each confirmed)
//!     → PayrollResult
//! ```
//!
//! The orchestrator only talks to the chain through [`PayrollChain`], so
//! tests drive it with an in-memory fake.

pub mod amount;
pub mod chain;
pub mod claims;
pub mod error;
pub mod orchestrator;
pub mod types;
pub mod wallets;

pub use chain::PayrollChain;
pub use claims::{check_claimable, ClaimQueryError, ClaimSchedule};
pub use error::{OrchestrationError, RequestError, RunStep};
pub use orchestrator::{find_payroll_created, PayrollOrchestrator};
pub use types::{Employee, PayrollIdSource, PayrollRequest, PayrollResult, PreparedEmployee, PreparedPayroll};
pub use wallets::{resolve_wallets, WalletResolutionError};
