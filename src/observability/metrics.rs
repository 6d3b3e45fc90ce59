//! Metrics collection and exposition.
//!
//! # Metrics
//! - `payroll_transactions_total` (counter): submitted transactions by step, outcome
//! - `payroll_runs_total` (counter): orchestration runs by outcome
//! - `payroll_id_source_total` (counter): how the payroll id was recovered
//! - `name_resolutions_total` (counter): name lookups by outcome
//!
//! Recording is a no-op until [`init_metrics`] installs an exporter.

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus exporter with a scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);

    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// `step` is `create_payroll` or `add_employee`; `outcome` is
/// `confirmed`, `reverted`, `timeout` or `error`.
pub fn record_transaction(step: &'static str, outcome: &'static str) {
    counter!("payroll_transactions_total", "step" => step, "outcome" => outcome).increment(1);
}

pub fn record_run(outcome: &'static str) {
    counter!("payroll_runs_total", "outcome" => outcome).increment(1);
}

pub fn record_payroll_id_source(source: &'static str) {
    counter!("payroll_id_source_total", "source" => source).increment(1);
}

pub fn record_name_resolution(outcome: &'static str) {
    counter!("name_resolutions_total", "outcome" => outcome).increment(1);
}
