mod mailer;
mod memory;
pub mod metrics;
mod rate_limit;
mod redis;

// Re-export the factory functions for easy access
pub use mailer::{create_log_mailer, create_mailer};
pub use memory::{
    create_memory_account_repository, create_memory_reset_token_store,
    create_memory_verification_store,
};
pub use metrics::{create_noop_metrics, create_prom_metrics};
pub use rate_limit::{create_fixed_window_limiter, create_noop_rate_limiter};
pub use redis::{
    create_redis_account_repository, create_redis_reset_token_store,
    create_redis_verification_store,
};
