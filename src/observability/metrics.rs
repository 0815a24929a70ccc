//! Metrics collection.
//!
//! # Metrics
//! - `bridge_requests_total` (counter): handled requests by method, outcome
//! - `bridge_request_duration_seconds` (histogram): adapter latency
//! - `bridge_uploads_total` (counter): materialization outcomes
//! - `bridge_temp_files_removed_total` (counter): reaper outcomes

use std::time::Instant;

/// Record one handled request.
pub fn record_request(method: &str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "bridge_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("bridge_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record the outcome of materializing one uploaded file.
pub fn record_upload(outcome: &'static str) {
    metrics::counter!("bridge_uploads_total", "outcome" => outcome).increment(1);
}

/// Record one temp file deletion attempt.
pub fn record_temp_file_removed(ok: bool) {
    let outcome = if ok { "removed" } else { "failed" };
    metrics::counter!("bridge_temp_files_removed_total", "outcome" => outcome).increment(1);
}
