//! On-chain payroll execution with ENS-style address resolution.

pub mod blockchain;
pub mod config;
pub mod observability;
pub mod payroll;
pub mod resolver;

pub use config::schema::PayrollChainConfig;
pub use payroll::{OrchestrationError, PayrollOrchestrator, PayrollRequest, PayrollResult};
pub use resolver::NameResolver;
