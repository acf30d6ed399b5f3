//! Metric recorders over the `metrics` facade.
//!
//! No recorder is installed by this crate; without one these are no-ops.

use ::metrics::{counter, histogram};

pub fn record_cache_hit(language: &str) {
    counter!("triage_simplify_cache_hits_total", "language" => language.to_string()).increment(1);
}

pub fn record_cache_miss(language: &str) {
    counter!("triage_simplify_cache_misses_total", "language" => language.to_string()).increment(1);
}

/// Record a completed backend call; `outcome` is "ok" or an error kind.
pub fn record_simplify_outcome(outcome: &'static str, latency_ms: u64) {
    counter!("triage_simplify_requests_total", "outcome" => outcome).increment(1);
    histogram!("triage_simplify_latency_ms", "outcome" => outcome).record(latency_ms as f64);
}

pub fn record_relay_request(route: &'static str, status: u16, latency_ms: u64) {
    counter!("triage_relay_requests_total", "route" => route, "status" => status.to_string())
        .increment(1);
    histogram!("triage_relay_latency_ms", "route" => route).record(latency_ms as f64);
}

pub fn record_relay_upstream_failure(route: &'static str) {
    counter!("triage_relay_upstream_failures_total", "route" => route).increment(1);
}
