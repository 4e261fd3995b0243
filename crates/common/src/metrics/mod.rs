//! Metrics and observability utilities
//!
//! Describes the AIC-IF metrics and provides recording helpers with
//! standardized naming conventions. The gateway installs the Prometheus
//! recorder; without one every helper here is a no-op.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all AIC-IF metrics
pub const METRICS_PREFIX: &str = "aicif";

/// Histogram buckets for request latency (in seconds)
/// Every operation is an in-memory scan, so the interesting range is small
pub const LATENCY_BUCKETS: &[f64] = &[
    0.0005, // 0.5ms
    0.001,  // 1ms
    0.0025, // 2.5ms
    0.005,  // 5ms
    0.010,  // 10ms
    0.025,  // 25ms
    0.050,  // 50ms
    0.100,  // 100ms
    0.250,  // 250ms
    1.000,  // 1s
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Request metrics
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    // Registry metrics
    describe_counter!(
        format!("{}_citations_logged_total", METRICS_PREFIX),
        Unit::Count,
        "Total citation events appended to the registry"
    );

    describe_gauge!(
        format!("{}_registry_citations", METRICS_PREFIX),
        Unit::Count,
        "Citation events currently held by the registry"
    );

    // Graph metrics
    describe_gauge!(
        format!("{}_graph_nodes", METRICS_PREFIX),
        Unit::Count,
        "Nodes in the knowledge graph"
    );

    describe_gauge!(
        format!("{}_graph_edges", METRICS_PREFIX),
        Unit::Count,
        "Edges in the knowledge graph"
    );

    describe_histogram!(
        format!("{}_path_search_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Citation path enumeration latency in seconds"
    );

    // Interpreter metrics
    describe_counter!(
        format!("{}_contribution_analyses_total", METRICS_PREFIX),
        Unit::Count,
        "Total feature attribution runs"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Helper to record a citation append
pub fn record_citation(ai_model: &str, registry_size: usize) {
    counter!(
        format!("{}_citations_logged_total", METRICS_PREFIX),
        "ai_model" => ai_model.to_string()
    )
    .increment(1);

    gauge!(format!("{}_registry_citations", METRICS_PREFIX)).set(registry_size as f64);
}

/// Helper to record knowledge graph size
pub fn record_graph_size(nodes: usize, edges: usize) {
    gauge!(format!("{}_graph_nodes", METRICS_PREFIX)).set(nodes as f64);
    gauge!(format!("{}_graph_edges", METRICS_PREFIX)).set(edges as f64);
}

/// Helper to record a path search
pub fn record_path_search(duration_secs: f64, paths_found: usize) {
    let outcome = if paths_found > 0 { "found" } else { "empty" };

    histogram!(
        format!("{}_path_search_duration_seconds", METRICS_PREFIX),
        "outcome" => outcome
    )
    .record(duration_secs);
}

/// Helper to record an attribution run
pub fn record_contribution_analysis(method: &str, feature_count: usize) {
    let outcome = if feature_count > 0 { "ok" } else { "unknown_input" };

    counter!(
        format!("{}_contribution_analyses_total", METRICS_PREFIX),
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}
