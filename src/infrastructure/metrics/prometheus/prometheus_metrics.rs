//! Prometheus metrics implementation.
//!
//! This module provides a concrete implementation of the `Metrics` trait using
//! the Prometheus metrics format. It delegates to utility functions in sibling
//! modules (`counters.rs`, `recorder.rs`) which handle the actual metrics
//! collection via the global `metrics` crate registry.
//!
//! The implementation follows a global registry pattern where metrics are
//! automatically registered when first used, and a single global handle
//! manages rendering all collected metrics in Prometheus text format.

use crate::domain::Metrics;
use std::time::Instant;

/// Prometheus-based metrics implementation.
///
/// This struct is intentionally empty because we use the global metrics registry
/// pattern via the `metrics` crate. All metrics are registered globally using
/// macros like `counter!()` and `histogram!()`, and the global PrometheusHandle
/// stored in `recorder.rs` manages the actual metrics collection and rendering.
pub struct PrometheusMetrics {
    // Empty - uses global metrics registry pattern
}

impl PrometheusMetrics {
    pub fn new() -> Self {
        tracing::info!("Creating Prometheus metrics");
        PrometheusMetrics {}
    }
}

impl Metrics for PrometheusMetrics {
    fn render(&self) -> String {
        // Use the recorder utility to get actual metrics
        super::render_metrics()
    }

    fn record_signup_started(&self) {
        super::increment_signup_started();
    }

    fn record_signup_rate_limited(&self) {
        super::increment_signup_rate_limited();
    }

    fn record_signup_rejected(&self) {
        super::increment_signup_rejected();
    }

    fn record_verification_confirmed(&self) {
        super::increment_verification_confirmed();
    }

    fn record_verification_failed(&self) {
        super::increment_verification_failed();
    }

    fn record_code_resent(&self) {
        super::increment_code_resent();
    }

    fn record_reset_requested(&self) {
        super::increment_reset_requested();
    }

    fn record_reset_completed(&self) {
        super::increment_reset_completed();
    }

    fn record_email_sent(&self, kind: &str) {
        super::increment_email_sent(kind);
    }

    fn record_email_failed(&self, kind: &str) {
        super::increment_email_failed(kind);
    }

    fn record_http_request(&self, start: Instant, _path: &str, _method: &str, _status: u16) {
        super::track_http_request(start);
    }
}
