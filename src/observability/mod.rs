//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! resolver, payroll, blockchain
//!     → logging.rs (structured log events, run_id span per payroll run)
//!     → metrics.rs (counters, optional Prometheus scrape endpoint)
//! ```

pub mod logging;
pub mod metrics;
