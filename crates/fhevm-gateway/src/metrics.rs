//! Prometheus metrics for the gateway
//!
//! Labels carry only outcome and action, never addresses or plaintexts.

use metrics::{counter, gauge, histogram};
use std::time::Duration;

pub const OUTCOME_OK: &str = "ok";
pub const OUTCOME_DENIED: &str = "denied";
pub const OUTCOME_CLIENT_ERROR: &str = "client_error";

pub const ACTION_GRANT: &str = "grant";
pub const ACTION_REVOKE: &str = "revoke";
pub const ACTION_CHECK: &str = "check";

pub fn record_decrypt(outcome: &str, duration: Duration) {
    counter!("gateway_decrypt_requests_total", "outcome" => outcome.to_string()).increment(1);
    histogram!("gateway_decrypt_duration_seconds", "outcome" => outcome.to_string())
        .record(duration.as_secs_f64());
}

pub fn record_acl(action: &str) {
    counter!("gateway_acl_requests_total", "action" => action.to_string()).increment(1);
}

pub fn set_grants(count: usize) {
    gauge!("gateway_acl_grants").set(count as f64);
}

pub fn init_prometheus_recorder(
) -> Result<metrics_exporter_prometheus::PrometheusHandle, metrics_exporter_prometheus::BuildError> {
    metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()
}
