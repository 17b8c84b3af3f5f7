//! Forgot/reset flow: anti-enumeration, single-use tokens, expiry, and the
//! stored credential actually changing.

mod common;

use common::{TestConfig, TestServer};
use serde_json::Value;

#[tokio::test]
async fn forgot_password_body_is_identical_for_known_and_unknown_emails() {
    // ---
    let server = TestServer::new().await;
    server.register_account("known@example.com", "longenough1").await;

    let known = server.forgot_password("known@example.com").await;
    let unknown = server.forgot_password("ghost@example.com").await;

    assert_eq!(known.status(), 200);
    assert_eq!(unknown.status(), 200);

    let known_body: Value = known.json().await.unwrap();
    let unknown_body: Value = unknown.json().await.unwrap();
    assert_eq!(known_body, unknown_body);
    assert_eq!(known_body["success"], true);
    assert_eq!(
        known_body["message"],
        "If the email exists, a reset link has been sent"
    );
}

#[tokio::test]
async fn forgot_password_requires_an_email() {
    // ---
    let server = TestServer::new().await;

    let response = server.forgot_password("").await;
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "ValidationError");
    assert_eq!(body["message"], "Email is required");
}

#[tokio::test]
async fn reset_token_is_single_use_and_changes_the_password() {
    // ---
    let server = TestServer::new().await;
    server.register_account("jane@company.com", "originalpass1").await;

    // The reset link only travels by email; tests mint the token through
    // the same store the handler uses.
    let token = server.reset_tokens.create("jane@company.com").await.unwrap();

    let response = server.reset_password(&token, "replacement9").await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Password has been reset successfully");

    // Old credential dead, new one live.
    assert_eq!(server.login("jane@company.com", "originalpass1").await.status(), 401);
    assert_eq!(server.login("jane@company.com", "replacement9").await.status(), 200);

    // Consumed tokens never work twice.
    let response = server.reset_password(&token, "thirdpassword3").await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "InvalidOrExpiredToken");
}

#[tokio::test]
async fn expired_reset_token_is_rejected() {
    // ---
    let server = TestServer::with_config(TestConfig {
        reset_token_ttl_seconds: 0,
        ..Default::default()
    })
    .await;

    let token = server.reset_tokens.create("jane@company.com").await.unwrap();

    let response = server.reset_password(&token, "replacement9").await;
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "InvalidOrExpiredToken");
    assert_eq!(body["message"], "Invalid or expired reset token");
}

#[tokio::test]
async fn reset_validation_failures_do_not_burn_the_token() {
    // ---
    let server = TestServer::new().await;
    server.register_account("jane@company.com", "originalpass1").await;

    let token = server.reset_tokens.create("jane@company.com").await.unwrap();

    let response = server.reset_password(&token, "short").await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Password must be at least 8 characters");

    let response = server.reset_password("", "replacement9").await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Token and password are required");

    // The failed attempts above never consumed the token.
    let response = server.reset_password(&token, "replacement9").await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn reset_for_address_without_account_still_reports_success() {
    // ---
    // The forgot flow hands out tokens regardless of registration, so the
    // reset flow must stay non-committal too.
    let server = TestServer::new().await;

    let token = server.reset_tokens.create("ghost@example.com").await.unwrap();

    let response = server.reset_password(&token, "replacement9").await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn bogus_reset_token_is_rejected() {
    // ---
    let server = TestServer::new().await;

    let response = server.reset_password(&"a".repeat(64), "replacement9").await;
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "InvalidOrExpiredToken");
}

#[tokio::test]
async fn login_after_reset_sets_a_session_cookie() {
    // ---
    let server = TestServer::new().await;
    server.register_account("jane@company.com", "originalpass1").await;

    let token = server.reset_tokens.create("jane@company.com").await.unwrap();
    assert_eq!(server.reset_password(&token, "replacement9").await.status(), 200);

    let response = server.login("jane@company.com", "replacement9").await;
    assert_eq!(response.status(), 200);

    let cookie = response
        .headers()
        .get("set-cookie")
        .expect("session cookie on login")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("token="));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["email"], "jane@company.com");
    assert_eq!(body["token"].as_str().unwrap().len(), 43);
}
