// src/lib.rs
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};

use handlers::{
    confirm_email, forgot_password, health_check, login, metrics_handler, resend_code,
    reset_password, root_handler, signup,
};
use redis::Client;
use std::env;

// Public exports (visible outside this module)
pub mod domain;

// Internal-only exports (sibling access within this module)
mod app_state;
mod config;
mod handlers;
mod infrastructure;
mod session;

// Hoist up only the public symbol(s)
pub use app_state::AppState;
pub use session::{issue_session_token, session_cookie};

pub use config::*;

// Publicly expose the infrastructure creation functions
pub use infrastructure::{
    create_fixed_window_limiter, // ---
    create_log_mailer,
    create_mailer,
    create_memory_account_repository,
    create_memory_reset_token_store,
    create_memory_verification_store,
    create_noop_metrics,
    create_noop_rate_limiter,
    create_prom_metrics,
    create_redis_account_repository,
    create_redis_reset_token_store,
    create_redis_verification_store,
};

/// Build the HTTP router with every backend determined by environment variables.
///
/// Wires the configured store backend (in-memory or Redis), the mailer
/// (HTTP API when a key is set, log otherwise), the signup rate limiter,
/// and the metrics implementation into an [`AppState`], then spawns the
/// periodic expiry sweep. Must run inside a Tokio runtime when the sweep
/// interval is nonzero.
pub fn create_router() -> Result<Router> {
    // ---
    // Load all configuration from environment
    let config = AppConfig::from_env()?;

    // Determine metrics implementation from environment
    let metrics_type = env::var("VERIMAIL_METRICS_TYPE").unwrap_or_else(|_| "noop".to_string());
    let metrics = if metrics_type == "prom" {
        create_prom_metrics()?
    } else {
        create_noop_metrics()?
    };

    tracing_subscriber::fmt::try_init().ok(); // Ignores if already initialized

    // Create the store backends
    let (verifications, reset_tokens, accounts, redis_client) = match config.store.backend {
        StoreBackend::Memory => (
            create_memory_verification_store(config.store.verification_ttl_seconds),
            create_memory_reset_token_store(config.store.reset_token_ttl_seconds),
            create_memory_account_repository(),
            None,
        ),
        StoreBackend::Redis => {
            let url = config
                .store
                .redis_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("redis backend selected without a URL"))?;
            let client = Client::open(url)?;
            (
                create_redis_verification_store(
                    client.clone(),
                    config.store.verification_ttl_seconds,
                ),
                create_redis_reset_token_store(
                    client.clone(),
                    config.store.reset_token_ttl_seconds,
                ),
                create_redis_account_repository(client.clone()),
                Some(client),
            )
        }
    };

    // A zero budget disables signup rate limiting
    let rate_limiter = if config.rate_limit.max_signups_per_ip == 0 {
        create_noop_rate_limiter()
    } else {
        create_fixed_window_limiter(
            config.rate_limit.max_signups_per_ip,
            config.rate_limit.window_seconds,
        )
    };

    let mailer = create_mailer(&config.mailer)?;

    // Build application state with all dependencies
    let app_state = AppState::new(
        verifications,
        reset_tokens,
        accounts,
        rate_limiter,
        mailer,
        metrics,
        redis_client,
        config.public_base_url.clone(),
    );

    spawn_expiry_sweeper(&app_state, config.store.sweep_interval_seconds);

    Ok(create_router_with_state(app_state))
}

/// Build the HTTP router around an already-assembled [`AppState`].
///
/// Tests use this to inject in-memory backends they keep handles to;
/// [`create_router`] delegates here once the environment-driven wiring is
/// done.
pub fn create_router_with_state(app_state: AppState) -> Router {
    // ---
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .nest(
            "/auth",
            Router::new()
                .route("/signup", post(signup))
                .route("/verify-email/confirm", post(confirm_email))
                .route("/verify-email/resend", post(resend_code))
                .route("/forgot-password", post(forgot_password))
                .route("/reset-password", post(reset_password))
                .route("/login", post(login)),
        )
        .with_state(app_state)
}

/// Spawn the periodic sweep that evicts expired records and rate windows.
///
/// Expiry is already enforced lazily on every read; the sweep only reclaims
/// memory held by entries nothing reads anymore. An interval of zero
/// disables it. The Redis backend evicts through native key TTLs, so its
/// sweeps report zero.
fn spawn_expiry_sweeper(state: &AppState, interval_seconds: u64) {
    // ---
    if interval_seconds == 0 {
        return;
    }

    let verifications = state.verifications().clone();
    let reset_tokens = state.reset_tokens().clone();
    let rate_limiter = state.rate_limiter().clone();

    tokio::spawn(async move {
        let period = std::time::Duration::from_secs(interval_seconds);
        loop {
            tokio::time::sleep(period).await;

            let mut evicted = 0usize;
            match verifications.sweep_expired().await {
                Ok(n) => evicted += n,
                Err(err) => tracing::error!("verification sweep failed: {err}"),
            }
            match reset_tokens.sweep_expired().await {
                Ok(n) => evicted += n,
                Err(err) => tracing::error!("reset token sweep failed: {err}"),
            }
            evicted += rate_limiter.sweep_expired().await;

            if evicted > 0 {
                tracing::info!(evicted, "expiry sweep removed stale entries");
            }
        }
    });
}
