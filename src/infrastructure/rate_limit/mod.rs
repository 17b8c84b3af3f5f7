mod fixed_window;
mod noop;

pub use fixed_window::FixedWindowLimiter;
pub use noop::NoopRateLimiter;

// Re-export the factory functions for easy access
pub use fixed_window::create as create_fixed_window_limiter;
pub use noop::create as create_noop_rate_limiter;
