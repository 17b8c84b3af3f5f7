use crate::domain::Metrics;
use std::time::Instant;

/// No-op metrics implementation for testing.
pub struct NoopMetrics;

impl NoopMetrics {
    pub fn new() -> Self {
        NoopMetrics
    }
}

impl Metrics for NoopMetrics {
    // ---
    fn render(&self) -> String {
        String::new()
    }
    fn record_signup_started(&self) {}
    fn record_signup_rate_limited(&self) {}
    fn record_signup_rejected(&self) {}
    fn record_verification_confirmed(&self) {}
    fn record_verification_failed(&self) {}
    fn record_code_resent(&self) {}
    fn record_reset_requested(&self) {}
    fn record_reset_completed(&self) {}
    fn record_email_sent(&self, _: &str) {}
    fn record_email_failed(&self, _: &str) {}
    fn record_http_request(&self, _: Instant, _: &str, _: &str, _: u16) {}
}
