use std::sync::Arc;

use crate::domain::{RateLimiter, RateLimiterPtr};

/// Creates a limiter that allows everything.
///
/// Used when signup rate limiting is disabled by configuration, and in
/// tests that exercise other flows.
pub fn create() -> RateLimiterPtr {
    Arc::new(NoopRateLimiter)
}

/// Pass-through limiter; every attempt is allowed.
pub struct NoopRateLimiter;

#[async_trait::async_trait]
impl RateLimiter for NoopRateLimiter {
    // ---
    async fn check(&self, _key: &str) -> bool {
        true
    }

    async fn sweep_expired(&self) -> usize {
        0
    }
}
