use metrics::{counter, histogram};
use std::time::Instant;

/// Increment a counter for signups that created a pending verification.
pub fn increment_signup_started() {
    counter!("signups_started_total").increment(1);
}

/// Increment a counter for signups refused by the per-IP rate limiter.
pub fn increment_signup_rate_limited() {
    counter!("signups_rate_limited_total").increment(1);
}

/// Increment a counter for signups refused by validation.
pub fn increment_signup_rejected() {
    counter!("signups_rejected_total").increment(1);
}

/// Increment a counter for confirmed verifications.
pub fn increment_verification_confirmed() {
    counter!("verifications_confirmed_total").increment(1);
}

/// Increment a counter for failed confirm attempts.
pub fn increment_verification_failed() {
    counter!("verifications_failed_total").increment(1);
}

/// Increment a counter for reissued verification codes.
pub fn increment_code_resent() {
    counter!("verification_codes_resent_total").increment(1);
}

/// Increment a counter for password-reset requests.
pub fn increment_reset_requested() {
    counter!("password_resets_requested_total").increment(1);
}

/// Increment a counter for completed password resets.
pub fn increment_reset_completed() {
    counter!("password_resets_completed_total").increment(1);
}

/// Increment a counter for delivered emails, labelled by template kind.
pub fn increment_email_sent(kind: &str) {
    counter!("emails_sent_total", "kind" => kind.to_string()).increment(1);
}

/// Increment a counter for failed email deliveries, labelled by template kind.
pub fn increment_email_failed(kind: &str) {
    counter!("emails_failed_total", "kind" => kind.to_string()).increment(1);
}

/// Track HTTP request latency using a histogram.
pub fn track_http_request(start: Instant) {
    let elapsed = start.elapsed();
    histogram!("http_request_duration_seconds").record(elapsed);
}
