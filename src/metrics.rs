//! Prometheus metrics for request outcomes and upstream latency.
//!
//! This module provides:
//! - Request counters labelled by outcome
//! - Upstream failure counters labelled by lookup stage
//! - Player lookup latency histogram

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{debug, info};

use crate::error::AppError;
use crate::profile::LookupStage;

// === Metric Name Constants ===

/// Requests handled, labelled by outcome.
pub const METRIC_REQUESTS: &str = "requests_total";
/// Upstream failures, labelled by stage.
pub const METRIC_UPSTREAM_FAILURES: &str = "upstream_failures_total";
/// Player lookup latency metric name.
pub const METRIC_PLAYER_LOOKUP_LATENCY: &str = "player_lookup_latency_ms";

/// Outcome label values for [`METRIC_REQUESTS`].
pub mod outcome {
    /// Origin rejected.
    pub const FORBIDDEN: &str = "forbidden";
    /// CORS preflight answered.
    pub const PREFLIGHT: &str = "preflight";
    /// Method other than GET/OPTIONS.
    pub const METHOD_NOT_ALLOWED: &str = "method_not_allowed";
    /// No route or failed player lookup.
    pub const NOT_FOUND: &str = "not_found";
    /// Player payload served.
    pub const PLAYER: &str = "player";
    /// Server stub served.
    pub const SERVER: &str = "server";
}

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(METRIC_REQUESTS, "Total number of requests by outcome");
    describe_counter!(
        METRIC_UPSTREAM_FAILURES,
        "Total number of failed player lookups by stage"
    );
    describe_histogram!(
        METRIC_PLAYER_LOOKUP_LATENCY,
        "End-to-end player lookup latency in milliseconds"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus exporter on its own listener.
pub fn install_exporter(addr: SocketAddr) -> Result<(), AppError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| AppError::Metrics(e.to_string()))?;

    info!("Metrics exporter listening on {}", addr);
    Ok(())
}

/// Increment the request counter for an outcome.
pub fn inc_requests(outcome: &'static str) {
    counter!(METRIC_REQUESTS, "outcome" => outcome).increment(1);
}

/// Increment the upstream failure counter for a stage.
pub fn inc_upstream_failures(stage: LookupStage) {
    let label: &'static str = stage.into();
    counter!(METRIC_UPSTREAM_FAILURES, "stage" => label).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let latency_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        histogram!(self.metric_name).record(latency_ms);
    }
}

/// Create a latency timer for a player lookup.
pub fn timer_player_lookup() -> LatencyTimer {
    LatencyTimer::new(METRIC_PLAYER_LOOKUP_LATENCY)
}
