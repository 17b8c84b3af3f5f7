//! Rate limiting seam for signup abuse control.
//!
//! Handlers talk to [`RateLimiter`] only; the concrete window bookkeeping
//! lives in `infrastructure::rate_limit`. Keys are client IP strings, with
//! requests of unknown origin sharing the [`UNKNOWN_CLIENT_IP`] bucket.

use std::sync::Arc;

/// Bucket key used when no client IP could be determined. All such
/// requests share one budget instead of each getting a fresh window.
pub const UNKNOWN_CLIENT_IP: &str = "unknown";

// ---

/// Fixed-window attempt counter.
#[async_trait::async_trait]
pub trait RateLimiter: Send + Sync {
    /// Record one attempt for `key` and return whether it is allowed.
    ///
    /// Every call counts against the window, including calls that return
    /// `false`; hammering a closed window never shortens the wait. A new
    /// window starts on the first attempt after the previous one elapses.
    /// Implementations fail open: if the underlying state is unavailable
    /// the attempt is allowed.
    async fn check(&self, key: &str) -> bool;

    /// Drop buckets whose window has fully elapsed, returning how many
    /// were removed.
    async fn sweep_expired(&self) -> usize;
}

/// Shared ownership alias used for dependency injection.
pub type RateLimiterPtr = Arc<dyn RateLimiter>;
