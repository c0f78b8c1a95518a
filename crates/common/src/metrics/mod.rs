//! Metrics and observability utilities
//!
//! Metric descriptions and recording helpers for the analysis agent. All
//! helpers go through the `metrics` facade and are no-ops until a recorder
//! (e.g. the Prometheus exporter installed by the CLI) is registered.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};

/// Metrics prefix for all AnalystForge metrics
pub const METRICS_PREFIX: &str = "analystforge";

/// Buckets for completion-service latency (LLM calls are slow)
pub const COMPLETION_BUCKETS: &[f64] = &[
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
    10.00,  // 10s
    30.00,  // 30s
    60.00,  // 1m
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Loader metrics
    describe_counter!(
        format!("{}_documents_loaded_total", METRICS_PREFIX),
        Unit::Count,
        "Total documents loaded into the content store"
    );

    describe_counter!(
        format!("{}_load_errors_total", METRICS_PREFIX),
        Unit::Count,
        "Total failed document loads"
    );

    // Q&A metrics
    describe_counter!(
        format!("{}_questions_total", METRICS_PREFIX),
        Unit::Count,
        "Total questions sent through the Q&A pipeline"
    );

    describe_histogram!(
        format!("{}_completion_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Completion service latency in seconds"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record loader metrics
pub fn record_load(kind: &str, success: bool, error_code: Option<&str>) {
    if success {
        counter!(
            format!("{}_documents_loaded_total", METRICS_PREFIX),
            "kind" => kind.to_string()
        )
        .increment(1);
    } else {
        counter!(
            format!("{}_load_errors_total", METRICS_PREFIX),
            "code" => error_code.unwrap_or("unknown").to_string()
        )
        .increment(1);
    }
}

/// Helper to record Q&A metrics.
///
/// `status` is one of `answered`, `sentinel`, `error`.
pub fn record_question(duration_secs: f64, model: &str, status: &str) {
    counter!(
        format!("{}_questions_total", METRICS_PREFIX),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        format!("{}_completion_duration_seconds", METRICS_PREFIX),
        "model" => model.to_string()
    )
    .record(duration_secs);
}
