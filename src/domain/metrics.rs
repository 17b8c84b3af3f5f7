use std::sync::Arc;
use std::time::Instant;

/// Abstraction for application metrics (counters, histograms).
pub trait Metrics: Send + Sync + 'static {
    // ---
    /// Render current metrics in Prometheus text format.
    fn render(&self) -> String;

    /// Record a signup that passed validation and created a pending
    /// verification.
    fn record_signup_started(&self);

    /// Record a signup rejected by the per-IP rate limiter.
    fn record_signup_rate_limited(&self);

    /// Record a signup rejected by validation (shape, password length,
    /// disposable domain).
    fn record_signup_rejected(&self);

    /// Record a confirmed verification (account materialized).
    fn record_verification_confirmed(&self);

    /// Record a failed confirm attempt (expired session or code mismatch).
    fn record_verification_failed(&self);

    /// Record a verification code reissued through the resend flow.
    fn record_code_resent(&self);

    /// Record a password-reset request (whether or not the email exists).
    fn record_reset_requested(&self);

    /// Record a completed password reset.
    fn record_reset_completed(&self);

    /// Record one outbound email delivery attempt.
    fn record_email_sent(&self, kind: &str);

    /// Record one failed outbound email delivery.
    fn record_email_failed(&self, kind: &str);

    /// Record HTTP request duration and labels.
    fn record_http_request(&self, start: Instant, path: &str, method: &str, status: u16);
}

/// Type alias for any backend that implements Metrics.
pub type MetricsPtr = Arc<dyn Metrics>;
