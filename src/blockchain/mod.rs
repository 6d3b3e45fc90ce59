//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key, RPC URL)
//!     → factory.rs (endpoint checks, liveness probe, chain id check)
//!     → wallet.rs (key loading, signing)
//!     → client.rs (RPC calls with timeouts, error classification)
//!     → payroll_contract.rs / ens.rs (contract calls)
//!     → transaction.rs (confirmation polling)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys; RPC URLs are logged masked (redact.rs)
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod contracts;
pub mod ens;
pub mod factory;
pub mod payroll_contract;
pub mod redact;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{ChainClientBundle, ReadClient};
pub use ens::EnsRegistryLookup;
pub use factory::ChainClientFactory;
pub use payroll_contract::{PayrollContract, PayrollReader};
pub use transaction::ConfirmationPolicy;
pub use types::{BlockchainConfig, BlockchainError, ChainId, ConfirmedTx, ErrorKind, RevertKind};
pub use wallet::Wallet;
