//! Prometheus metrics exposition
//!
//! Two counters cover what operators actually watch here:
//!
//! - `gate_requests_total` (counter): label `state` — which arm of the auth
//!   flow each request resolved to
//! - `gate_background_failures_total` (counter): label `operation` — logout's
//!   detached revoke/remove work that failed after the response was sent

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Instant;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Runtime counters surfaced on the internal health endpoint.
#[derive(Debug, Clone)]
pub struct ServiceMetrics {
    pub requests_total: Arc<AtomicU64>,
    /// Failures of detached logout work. These never reach a browser; this
    /// counter (and the warn logs) is the only place they are visible.
    pub background_failures: Arc<AtomicU64>,
    pub started_at: Instant,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self {
            requests_total: Arc::new(AtomicU64::new(0)),
            background_failures: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
        }
    }
}

/// Install the Prometheus recorder and return a handle for rendering metrics.
///
/// The handle's `render()` method produces the Prometheus text exposition
/// format served on the internal `/metrics` endpoint.
pub fn install_recorder() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder")
}

/// Record a request resolving to the given auth-flow state.
pub fn record_request(state: &str) {
    metrics::counter!("gate_requests_total", "state" => state.to_string()).increment(1);
}

/// Record a detached logout operation failing in the background.
pub fn record_background_failure(operation: &str) {
    metrics::counter!("gate_background_failures_total", "operation" => operation.to_string())
        .increment(1);
}
