//! Prometheus metrics for invoice-form.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder,
};

/// Submission counter by outcome.
pub static SUBMISSIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "invoice_form_submissions_total",
        "Total number of invoice submissions by outcome",
        &["outcome"] // created, updated, rejected, failed
    )
    .expect("Failed to register submissions_total")
});

/// Allocated invoice numbers by source.
pub static NUMBERS_ALLOCATED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "invoice_form_numbers_allocated_total",
        "Total number of invoice numbers allocated by source",
        &["source"] // sequence, fallback
    )
    .expect("Failed to register numbers_allocated_total")
});

/// Error counter for alerting.
pub static ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "invoice_form_errors_total",
        "Total number of errors by type",
        &["error_type"]
    )
    .expect("Failed to register errors_total")
});

/// Invoice store request duration histogram.
pub static STORE_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "invoice_form_store_request_duration_seconds",
        "Invoice store request duration in seconds",
        &["operation"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("Failed to register store_request_duration")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&SUBMISSIONS_TOTAL);
    Lazy::force(&NUMBERS_ALLOCATED_TOTAL);
    Lazy::force(&ERRORS_TOTAL);
    Lazy::force(&STORE_REQUEST_DURATION);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
