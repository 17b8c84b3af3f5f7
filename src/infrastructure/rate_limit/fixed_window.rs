use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::domain::{RateLimiter, RateLimiterPtr};

/// Creates a fixed-window limiter allowing `max_attempts` per key within
/// each `window_seconds`-long window.
pub fn create(max_attempts: u32, window_seconds: u64) -> RateLimiterPtr {
    // ---
    std::sync::Arc::new(FixedWindowLimiter::new(
        max_attempts,
        Duration::from_secs(window_seconds),
    ))
}

struct Window {
    // ---
    count: u32,
    started_at: Instant,
}

/// In-process fixed-window attempt counter.
///
/// A key's window opens on its first attempt and every attempt inside it
/// counts, allowed or not. Once the window elapses the next attempt opens
/// a fresh one with count 1. Monotonic time, so wall-clock jumps cannot
/// reopen or extend a window.
pub struct FixedWindowLimiter {
    // ---
    windows: Mutex<HashMap<String, Window>>,
    max_attempts: u32,
    window: Duration,
}

impl FixedWindowLimiter {
    // ---
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        // ---
        Self {
            windows: Mutex::new(HashMap::new()),
            max_attempts,
            window,
        }
    }

    fn windows(&self) -> MutexGuard<'_, HashMap<String, Window>> {
        self.windows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn attempt_count(&self, key: &str) -> u32 {
        self.windows().get(key).map_or(0, |w| w.count)
    }
}

#[async_trait::async_trait]
impl RateLimiter for FixedWindowLimiter {
    // ---
    async fn check(&self, key: &str) -> bool {
        // ---
        let now = Instant::now();
        let mut windows = self.windows();

        match windows.get_mut(key) {
            None => {
                windows.insert(
                    key.to_string(),
                    Window {
                        count: 1,
                        started_at: now,
                    },
                );
                true
            }
            Some(w) if now.duration_since(w.started_at) > self.window => {
                *w = Window {
                    count: 1,
                    started_at: now,
                };
                true
            }
            Some(w) => {
                w.count += 1;
                w.count <= self.max_attempts
            }
        }
    }

    async fn sweep_expired(&self) -> usize {
        // ---
        let now = Instant::now();
        let mut windows = self.windows();
        let before = windows.len();
        windows.retain(|_, w| now.duration_since(w.started_at) <= self.window);

        before - windows.len()
    }
}
