//! Application state management.
//!
//! This module defines the shared state structure that gets passed to all
//! Axum handlers via the `State` extractor. The `AppState` contains the
//! store seams, the rate limiter, the mailer, metrics, and the handful of
//! knobs handlers need at request time.
//!
//! The state is designed to be cheaply cloneable (using `Arc` internally
//! where needed) so it can be passed efficiently to each request handler
//! without expensive copying of resources.

use crate::domain::{
    AccountRepositoryPtr, MailerPtr, MetricsPtr, RateLimiterPtr, ResetTokenStorePtr,
    VerificationStorePtr,
};
use redis::Client;

/// Shared application state passed to all Axum handlers.
///
/// This struct serves as the Dependency Injection container for the
/// application. It holds all shared resources needed by HTTP handlers and
/// is cloned cheaply for each request via Axum's `State` extractor.
///
/// # Design Principles
///
/// - **Dependency Inversion**: Handlers depend on abstractions
///   (`VerificationStore`, `Mailer`, ...), never on the memory or Redis
///   implementations behind them. The same orchestration logic runs
///   against in-process maps in tests and shared Redis in production.
/// - **Immutable After Initialization**: State is built once at startup
///   and never mutated; all mutation lives inside the stores.
/// - **Cheap Cloning**: Every heavy resource is behind an `Arc`, making
///   the struct efficiently cloneable.
///
/// # Lifecycle
///
/// 1. Created once in `create_router()` during application startup
///    (or directly by tests that inject their own backends)
/// 2. Attached to the Axum router via `.with_state(app_state)`
/// 3. Cloned automatically by Axum for each incoming HTTP request
/// 4. Handlers extract via `State(state): State<AppState>`
#[derive(Clone)]
pub struct AppState {
    /// Pending signups awaiting their one-time code.
    verifications: VerificationStorePtr,

    /// Single-use password-reset credentials.
    reset_tokens: ResetTokenStorePtr,

    /// Materialized accounts, keyed by normalized email.
    accounts: AccountRepositoryPtr,

    /// Per-IP signup attempt counter.
    rate_limiter: RateLimiterPtr,

    /// Outbound email delivery (HTTP API in production, log in dev).
    mailer: MailerPtr,

    /// Metrics implementation for recording application events.
    ///
    /// Either Prometheus-backed (production) or no-op (testing).
    metrics: MetricsPtr,

    /// Redis client when the `redis` store backend is active.
    ///
    /// Only the full-mode health check touches this directly; everything
    /// else reaches Redis through the store traits.
    redis_client: Option<Client>,

    /// Public origin used for links embedded in outbound email.
    public_base_url: String,
}

impl AppState {
    // ---

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        verifications: VerificationStorePtr,
        reset_tokens: ResetTokenStorePtr,
        accounts: AccountRepositoryPtr,
        rate_limiter: RateLimiterPtr,
        mailer: MailerPtr,
        metrics: MetricsPtr,
        redis_client: Option<Client>,
        public_base_url: String,
    ) -> Self {
        // ---
        AppState {
            verifications,
            reset_tokens,
            accounts,
            rate_limiter,
            mailer,
            metrics,
            redis_client,
            public_base_url,
        }
    }

    /// Get a reference to the pending-verification store.
    pub fn verifications(&self) -> &VerificationStorePtr {
        // ---
        &self.verifications
    }

    /// Get a reference to the reset-token store.
    pub fn reset_tokens(&self) -> &ResetTokenStorePtr {
        // ---
        &self.reset_tokens
    }

    /// Get a reference to the account repository.
    pub fn accounts(&self) -> &AccountRepositoryPtr {
        // ---
        &self.accounts
    }

    /// Get a reference to the signup rate limiter.
    pub fn rate_limiter(&self) -> &RateLimiterPtr {
        // ---
        &self.rate_limiter
    }

    /// Get a reference to the outbound mailer.
    pub fn mailer(&self) -> &MailerPtr {
        // ---
        &self.mailer
    }

    /// Get a reference to the metrics implementation.
    pub fn metrics(&self) -> &MetricsPtr {
        // ---
        &self.metrics
    }

    /// Get the Redis client, present only with the `redis` backend.
    pub fn redis_client(&self) -> Option<&Client> {
        // ---
        self.redis_client.as_ref()
    }

    /// Get the public base URL (no trailing slash).
    pub fn public_base_url(&self) -> &str {
        // ---
        &self.public_base_url
    }
}

#[cfg(test)]
mod tests {
    // ---

    use super::*;
    use crate::infrastructure::{
        create_log_mailer, create_memory_account_repository, create_memory_reset_token_store,
        create_memory_verification_store, create_noop_metrics, create_noop_rate_limiter,
    };

    fn memory_state() -> AppState {
        // ---
        AppState::new(
            create_memory_verification_store(900),
            create_memory_reset_token_store(3600),
            create_memory_account_repository(),
            create_noop_rate_limiter(),
            create_log_mailer(),
            create_noop_metrics().unwrap(),
            None,
            "http://localhost:8080".to_string(),
        )
    }

    #[test]
    fn app_state_creation_and_clone() {
        // ---
        let state = memory_state();
        let _cloned = state.clone();

        // Verify accessors work
        let _ = state.verifications();
        let _ = state.reset_tokens();
        let _ = state.accounts();
        let _ = state.rate_limiter();
        let _ = state.mailer();
        let _ = state.metrics();
        assert!(state.redis_client().is_none());
        assert_eq!(state.public_base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn state_is_usable_across_clones() {
        // ---
        // Both clones must observe the same underlying store.
        let state = memory_state();
        let cloned = state.clone();

        let data = crate::domain::SignupData {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            signup_ip: "203.0.113.9".to_string(),
        };
        let issued = state.verifications().create(data).await.unwrap();

        let seen = cloned.verifications().lookup(&issued.token).await.unwrap();
        assert!(seen.is_some());
    }
}
