//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define relay metrics (submissions, outcomes, chat activity)
//! - Expose a Prometheus-compatible metrics endpoint when enabled
//!
//! # Metrics
//! - `relay_submissions_total` (counter): submissions by method, accepted
//! - `relay_outcomes_total` (counter): lifecycle verdicts by action, outcome
//! - `relay_chat_events_total` (counter): chat relay activity by kind
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Outcome labels match the lifecycle verdicts one to one, so a timeout is
//!   never counted as a failure

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exposition endpoint.
///
/// Failures are logged rather than fatal; the relay works without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            tracing::info!(address = %addr, "Metrics endpoint listening");
        }
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint");
        }
    }
}

/// Count one submission attempt.
pub fn record_submission(method: &str, accepted: bool) {
    counter!(
        "relay_submissions_total",
        "method" => method.to_string(),
        "accepted" => if accepted { "true" } else { "false" },
    )
    .increment(1);
}

/// Count one lifecycle verdict.
pub fn record_outcome(action: &str, outcome: &'static str) {
    counter!(
        "relay_outcomes_total",
        "action" => action.to_string(),
        "outcome" => outcome,
    )
    .increment(1);
}

/// Count one chat relay event.
pub fn record_chat_event(kind: &'static str) {
    counter!("relay_chat_events_total", "kind" => kind).increment(1);
}
