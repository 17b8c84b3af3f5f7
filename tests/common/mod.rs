// Test helpers are intentionally partially used
#![allow(dead_code)]

use reqwest::Client;
use serde_json::json;
use std::sync::Once;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::sleep;

use verimail_auth::domain::{
    AccountRepositoryPtr, RateLimiterPtr, ResetTokenStorePtr, VerificationStorePtr,
};
use verimail_auth::{
    create_log_mailer, create_memory_account_repository, create_memory_reset_token_store,
    create_memory_verification_store, create_noop_metrics, create_noop_rate_limiter,
    create_router_with_state, AppState,
};

macro_rules! set_env_if_unset {
    // ---
    ($key:expr, $val:expr) => {
        if std::env::var($key).is_err() {
            std::env::set_var($key, $val);
        }
    };
}

static INIT: Once = Once::new();

// ============================================================================
// Test Setup
// ============================================================================

/// Environment defaults for tests that build the router from the
/// environment instead of injecting backends.
pub fn setup_test_env() {
    // ---
    INIT.call_once(|| {
        // ---
        set_env_if_unset!("VERIMAIL_STORE_BACKEND", "memory");
        set_env_if_unset!("VERIMAIL_METRICS_TYPE", "noop");
        set_env_if_unset!("VERIMAIL_SWEEP_INTERVAL_SEC", "0");
        set_env_if_unset!("VERIMAIL_MAX_SIGNUPS_PER_IP", "0");
    });
}

/// Backend knobs for one test server; most tests take the defaults and
/// override a single field.
pub struct TestConfig {
    pub verification_ttl_seconds: u64,
    pub reset_token_ttl_seconds: u64,
    pub rate_limiter: RateLimiterPtr,
}

impl Default for TestConfig {
    // ---
    fn default() -> Self {
        Self {
            verification_ttl_seconds: 900,
            reset_token_ttl_seconds: 3600,
            rate_limiter: create_noop_rate_limiter(),
        }
    }
}

/// An in-process server over injected in-memory backends, plus handles to
/// those backends so tests can inspect state the HTTP surface keeps hidden
/// (most importantly: the verification code, which only travels by email).
pub struct TestServer {
    pub addr: std::net::SocketAddr,
    pub client: Client,
    pub verifications: VerificationStorePtr,
    pub reset_tokens: ResetTokenStorePtr,
    pub accounts: AccountRepositoryPtr,
}

impl TestServer {
    // ---
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    pub async fn with_config(config: TestConfig) -> Self {
        // --

        let verifications = create_memory_verification_store(config.verification_ttl_seconds);
        let reset_tokens = create_memory_reset_token_store(config.reset_token_ttl_seconds);
        let accounts = create_memory_account_repository();

        let state = AppState::new(
            verifications.clone(),
            reset_tokens.clone(),
            accounts.clone(),
            config.rate_limiter,
            create_log_mailer(),
            create_noop_metrics().expect("noop metrics"),
            None,
            "http://localhost:8080".to_string(),
        );

        let app = create_router_with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start
        sleep(Duration::from_millis(100)).await;

        let client = Client::new();

        Self {
            addr,
            client,
            verifications,
            reset_tokens,
            accounts,
        }
    }

    pub fn url(&self, path: &str) -> String {
        // ---
        format!("http://{}{}", self.addr, path)
    }

    // ------------------------------------------------------------------
    // Flow helpers
    // ------------------------------------------------------------------

    pub async fn signup(&self, full_name: &str, email: &str, password: &str) -> reqwest::Response {
        // ---
        self.client
            .post(self.url("/auth/signup"))
            .json(&json!({
                "full_name": full_name,
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("signup request failed")
    }

    /// Signup carrying an explicit client address in `x-forwarded-for`.
    pub async fn signup_from_ip(&self, email: &str, ip: &str) -> reqwest::Response {
        // ---
        self.client
            .post(self.url("/auth/signup"))
            .header("x-forwarded-for", ip)
            .json(&json!({
                "full_name": "Jane Doe",
                "email": email,
                "password": "longenough1",
            }))
            .send()
            .await
            .expect("signup request failed")
    }

    /// Signup expected to succeed; returns the verification token.
    pub async fn signup_ok(&self, email: &str) -> String {
        // ---
        let response = self.signup("Jane Doe", email, "longenough1").await;
        assert_eq!(response.status(), 201);

        let body: serde_json::Value = response.json().await.expect("signup body");
        assert_eq!(body["requiresVerification"], true);
        body["verificationToken"]
            .as_str()
            .expect("verificationToken in signup body")
            .to_string()
    }

    /// The code currently live for `token`, read straight from the injected
    /// store. The API never returns codes, so tests recover them the same
    /// way an operator reading the mail log would.
    pub async fn current_code(&self, token: &str) -> String {
        // ---
        self.verifications
            .lookup(token)
            .await
            .expect("verification store lookup")
            .expect("live pending record for token")
            .code
    }

    pub async fn confirm(&self, token: &str, code: &str) -> reqwest::Response {
        // ---
        self.client
            .post(self.url("/auth/verify-email/confirm"))
            .json(&json!({ "token": token, "code": code }))
            .send()
            .await
            .expect("confirm request failed")
    }

    pub async fn resend(&self, token: &str) -> reqwest::Response {
        // ---
        self.client
            .post(self.url("/auth/verify-email/resend"))
            .json(&json!({ "token": token }))
            .send()
            .await
            .expect("resend request failed")
    }

    pub async fn forgot_password(&self, email: &str) -> reqwest::Response {
        // ---
        self.client
            .post(self.url("/auth/forgot-password"))
            .json(&json!({ "email": email }))
            .send()
            .await
            .expect("forgot-password request failed")
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> reqwest::Response {
        // ---
        self.client
            .post(self.url("/auth/reset-password"))
            .json(&json!({ "token": token, "password": password }))
            .send()
            .await
            .expect("reset-password request failed")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        // ---
        self.client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("login request failed")
    }

    /// Signup plus confirm, leaving a real account behind.
    pub async fn register_account(&self, email: &str, password: &str) {
        // ---
        let response = self.signup("Jane Doe", email, password).await;
        assert_eq!(response.status(), 201);
        let body: serde_json::Value = response.json().await.expect("signup body");
        let token = body["verificationToken"].as_str().expect("token").to_string();

        let code = self.current_code(&token).await;
        let response = self.confirm(&token, &code).await;
        assert_eq!(response.status(), 200);
    }
}

/// A 6-digit code guaranteed different from `code`.
pub fn wrong_code(code: &str) -> &'static str {
    // ---
    if code == "000000" {
        "000001"
    } else {
        "000000"
    }
}
