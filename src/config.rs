// src/config.rs

//! Application configuration loaded from environment variables.
//!
//! This module defines all startup-time configuration for the service.
//! Configuration is validated eagerly and failures are treated as
//! deployment errors rather than recoverable runtime conditions.

use anyhow::Result;

// ============================================================
// Local macros (config-only, intentionally explicit)
// ============================================================

/// Reads a required environment variable.
///
/// # Behavior
/// - Fails fast if the variable is missing
/// - Produces a clear, human-readable error message
/// - Intended for startup-time configuration validation
///
/// Missing configuration is treated as a deployment error,
/// not a recoverable runtime condition.
macro_rules! required_env {
    // ---
    ($key:literal) => {
        std::env::var($key)
            .map_err(|_| anyhow::anyhow!(concat!("Missing required configuration: ", $key)))?
    };
}

/// Reads an optional environment variable and attempts to parse it.
///
/// If the variable is missing or cannot be parsed, the provided
/// default value is used. This macro is appropriate for non-critical
/// tuning parameters where fallback behavior is acceptable.
macro_rules! optional_env_parse {
    // ---
    ($key:literal, $ty:ty, $default:expr) => {
        std::env::var($key)
            .ok()
            .and_then(|v| v.parse::<$ty>().ok())
            .unwrap_or($default)
    };
}

#[cfg(test)]
/// Asserts that a configuration constructor fails due to a missing
/// required environment variable.
///
/// This macro is intended for config unit tests only and enforces
/// consistent error messages across failure cases.
macro_rules! assert_missing_config {
    // ---
    ($expr:expr, $key:literal) => {{
        let err = $expr.expect_err("expected configuration error");
        assert!(
            err.to_string()
                .contains(concat!("Missing required configuration: ", $key)),
            "unexpected error: {err}"
        );
    }};
}

// ============================================================
// Public configuration facade
// ============================================================

/// Aggregated application configuration.
///
/// This is the single source of truth for startup configuration.
/// All required configuration is validated eagerly during initialization.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: store::StoreConfig,
    pub rate_limit: rate_limit::RateLimitConfig,
    pub mailer: mailer::MailerConfig,

    /// Public origin of the service, used when building links that leave
    /// the process (password-reset URLs, dashboard links in emails).
    pub public_base_url: String,
}

impl AppConfig {
    /// Loads and validates all application configuration from the environment.
    ///
    /// # Errors
    /// Returns an error if any required configuration is missing or invalid.
    /// This function is intended to be called exactly once at startup.
    pub fn from_env() -> Result<Self> {
        // ---
        let public_base_url = std::env::var("VERIMAIL_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());

        Ok(Self {
            store: store::StoreConfig::from_env()?,
            rate_limit: rate_limit::RateLimitConfig::from_env()?,
            mailer: mailer::MailerConfig::from_env()?,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }
}

// ============================================================
// Store configuration
// ============================================================

mod store {
    // ---
    use super::*;

    /// Which backend holds pending verifications, reset tokens, and
    /// accounts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum StoreBackend {
        /// Process-local maps. Single-node deployments and tests.
        Memory,
        /// Shared Redis. Required when more than one instance serves the
        /// signup flow, so every instance sees the same pending sessions.
        Redis,
    }

    /// Storage-related configuration derived from environment variables.
    #[derive(Debug, Clone)]
    pub struct StoreConfig {
        /// Selected backend (`VERIMAIL_STORE_BACKEND`: `memory` | `redis`).
        pub backend: StoreBackend,

        /// Redis connection string. Required when the backend is `redis`,
        /// ignored otherwise.
        pub redis_url: Option<String>,

        /// Lifetime of a pending verification, refreshed on resend.
        /// Defaults to 900 seconds (15 minutes).
        pub verification_ttl_seconds: u64,

        /// Lifetime of a password-reset token. Defaults to 3600 seconds.
        pub reset_token_ttl_seconds: u64,

        /// Cadence of the background expiry sweep in seconds; `0` disables
        /// the sweeper (expiry is still enforced lazily on every read).
        /// Defaults to 300.
        pub sweep_interval_seconds: u64,
    }

    impl StoreConfig {
        /// Builds a [`StoreConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error on an unknown backend name, or when the
        /// backend is `redis` and no connection string is configured.
        pub fn from_env() -> Result<Self> {
            // ---
            let backend_name = std::env::var("VERIMAIL_STORE_BACKEND")
                .unwrap_or_else(|_| "memory".to_string());

            let (backend, redis_url) = match backend_name.as_str() {
                "memory" => (StoreBackend::Memory, None),
                "redis" => {
                    let url = required_env!("VERIMAIL_REDIS_URL");
                    (StoreBackend::Redis, Some(url))
                }
                other => anyhow::bail!(
                    "Invalid VERIMAIL_STORE_BACKEND '{other}' (expected 'memory' or 'redis')"
                ),
            };

            let verification_ttl_seconds =
                optional_env_parse!("VERIMAIL_VERIFICATION_TTL_SEC", u64, 900);
            let reset_token_ttl_seconds =
                optional_env_parse!("VERIMAIL_RESET_TOKEN_TTL_SEC", u64, 3600);
            let sweep_interval_seconds =
                optional_env_parse!("VERIMAIL_SWEEP_INTERVAL_SEC", u64, 300);

            Ok(Self {
                backend,
                redis_url,
                verification_ttl_seconds,
                reset_token_ttl_seconds,
                sweep_interval_seconds,
            })
        }
    }
}
pub use store::{StoreBackend, StoreConfig};

// ============================================================
// Rate limit configuration
// ============================================================

mod rate_limit {
    // ---
    use super::*;

    /// Signup rate limiter tuning.
    ///
    /// One fixed window per client IP; attempts beyond the threshold
    /// inside a window are rejected with 429.
    #[derive(Debug, Clone)]
    pub struct RateLimitConfig {
        /// Allowed signup attempts per IP per window. `0` disables the
        /// limiter entirely. Defaults to 3.
        pub max_signups_per_ip: u32,

        /// Window length in seconds. Defaults to 86400 (24 hours).
        pub window_seconds: u64,
    }

    impl RateLimitConfig {
        /// Builds a [`RateLimitConfig`] from environment variables.
        pub fn from_env() -> Result<Self> {
            // ---
            let max_signups_per_ip = optional_env_parse!("VERIMAIL_MAX_SIGNUPS_PER_IP", u32, 3);
            let window_seconds = optional_env_parse!("VERIMAIL_RATE_LIMIT_WINDOW_SEC", u64, 86_400);

            Ok(Self {
                max_signups_per_ip,
                window_seconds,
            })
        }
    }
}
pub use rate_limit::RateLimitConfig;

// ============================================================
// Mailer configuration
// ============================================================

mod mailer {
    // ---
    use super::*;

    /// Outbound email configuration.
    ///
    /// Without an API key the service runs in dev mode: messages are
    /// logged instead of delivered, and the flows stay fully usable.
    #[derive(Debug, Clone)]
    pub struct MailerConfig {
        /// Bearer key for the mail API. Absent means the log mailer.
        pub api_key: Option<String>,

        /// Resend-compatible endpoint to POST messages to.
        pub api_url: String,

        /// Sender, `Name <address>` form.
        pub from: String,

        /// Request timeout in seconds; bounds how long a stalled mail
        /// provider can hold up a signup response. Defaults to 10.
        pub timeout_seconds: u64,
    }

    impl MailerConfig {
        /// Builds a [`MailerConfig`] from environment variables.
        pub fn from_env() -> Result<Self> {
            // ---
            let api_key = std::env::var("VERIMAIL_MAIL_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty());
            let api_url = std::env::var("VERIMAIL_MAIL_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com/emails".to_string());
            let from = std::env::var("VERIMAIL_MAIL_FROM")
                .unwrap_or_else(|_| "Verimail <noreply@verimail.dev>".to_string());
            let timeout_seconds = optional_env_parse!("VERIMAIL_MAIL_TIMEOUT_SEC", u64, 10);

            Ok(Self {
                api_key,
                api_url,
                from,
                timeout_seconds,
            })
        }
    }
}
pub use mailer::MailerConfig;

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use anyhow::Result;
    use serial_test::serial;

    fn clear_env() {
        // ---
        for key in [
            "VERIMAIL_STORE_BACKEND",
            "VERIMAIL_REDIS_URL",
            "VERIMAIL_VERIFICATION_TTL_SEC",
            "VERIMAIL_RESET_TOKEN_TTL_SEC",
            "VERIMAIL_SWEEP_INTERVAL_SEC",
            "VERIMAIL_MAX_SIGNUPS_PER_IP",
            "VERIMAIL_RATE_LIMIT_WINDOW_SEC",
            "VERIMAIL_MAIL_API_KEY",
            "VERIMAIL_MAIL_API_URL",
            "VERIMAIL_MAIL_FROM",
            "VERIMAIL_MAIL_TIMEOUT_SEC",
            "VERIMAIL_PUBLIC_BASE_URL",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_applied_with_empty_env() -> Result<()> {
        // ---
        clear_env();

        let cfg = AppConfig::from_env()?;
        assert_eq!(cfg.store.backend, StoreBackend::Memory);
        assert_eq!(cfg.store.redis_url, None);
        assert_eq!(cfg.store.verification_ttl_seconds, 900);
        assert_eq!(cfg.store.reset_token_ttl_seconds, 3600);
        assert_eq!(cfg.store.sweep_interval_seconds, 300);
        assert_eq!(cfg.rate_limit.max_signups_per_ip, 3);
        assert_eq!(cfg.rate_limit.window_seconds, 86_400);
        assert_eq!(cfg.mailer.api_key, None);
        assert_eq!(cfg.mailer.api_url, "https://api.resend.com/emails");
        assert_eq!(cfg.mailer.timeout_seconds, 10);
        assert_eq!(cfg.public_base_url, "http://localhost:8080");

        Ok(())
    }

    #[test]
    #[serial]
    fn overrides_replace_defaults() -> Result<()> {
        // ---
        clear_env();
        std::env::set_var("VERIMAIL_VERIFICATION_TTL_SEC", "60");
        std::env::set_var("VERIMAIL_RESET_TOKEN_TTL_SEC", "120");
        std::env::set_var("VERIMAIL_SWEEP_INTERVAL_SEC", "0");
        std::env::set_var("VERIMAIL_MAX_SIGNUPS_PER_IP", "10");
        std::env::set_var("VERIMAIL_RATE_LIMIT_WINDOW_SEC", "3600");
        std::env::set_var("VERIMAIL_MAIL_TIMEOUT_SEC", "3");
        std::env::set_var("VERIMAIL_PUBLIC_BASE_URL", "https://app.verimail.dev/");

        let cfg = AppConfig::from_env()?;
        assert_eq!(cfg.store.verification_ttl_seconds, 60);
        assert_eq!(cfg.store.reset_token_ttl_seconds, 120);
        assert_eq!(cfg.store.sweep_interval_seconds, 0);
        assert_eq!(cfg.rate_limit.max_signups_per_ip, 10);
        assert_eq!(cfg.rate_limit.window_seconds, 3600);
        assert_eq!(cfg.mailer.timeout_seconds, 3);
        // Trailing slash is stripped so link-building can always append.
        assert_eq!(cfg.public_base_url, "https://app.verimail.dev");

        clear_env();
        Ok(())
    }

    #[test]
    #[serial]
    fn redis_backend_requires_url() {
        // ---
        clear_env();
        std::env::set_var("VERIMAIL_STORE_BACKEND", "redis");

        assert_missing_config!(store::StoreConfig::from_env(), "VERIMAIL_REDIS_URL");

        clear_env();
    }

    #[test]
    #[serial]
    fn redis_backend_with_url_succeeds() -> Result<()> {
        // ---
        clear_env();
        std::env::set_var("VERIMAIL_STORE_BACKEND", "redis");
        std::env::set_var("VERIMAIL_REDIS_URL", "redis://localhost:6379");

        let cfg = store::StoreConfig::from_env()?;
        assert_eq!(cfg.backend, StoreBackend::Redis);
        assert_eq!(cfg.redis_url.as_deref(), Some("redis://localhost:6379"));

        clear_env();
        Ok(())
    }

    #[test]
    #[serial]
    fn unknown_backend_is_rejected() {
        // ---
        clear_env();
        std::env::set_var("VERIMAIL_STORE_BACKEND", "etcd");

        let err = store::StoreConfig::from_env().expect_err("expected configuration error");
        assert!(err.to_string().contains("Invalid VERIMAIL_STORE_BACKEND"));

        clear_env();
    }

    #[test]
    #[serial]
    fn blank_mail_api_key_means_dev_mailer() -> Result<()> {
        // ---
        clear_env();
        std::env::set_var("VERIMAIL_MAIL_API_KEY", "   ");

        let cfg = mailer::MailerConfig::from_env()?;
        assert_eq!(cfg.api_key, None);

        clear_env();
        Ok(())
    }
}
