//! Live-server tests for the Redis backend.
//!
//! These exercise the Lua paths against a real Redis. When none is
//! reachable they skip instead of failing, so the suite stays green on
//! machines without one; the in-memory backend covers the shared
//! semantics either way.

use redis::Client;

use super::{RedisResetTokenStore, RedisVerificationStore};
use crate::domain::{ResetTokenStore, SignupData, StoreError, VerificationStore};

async fn live_client() -> Option<Client> {
    // ---
    let url = std::env::var("VERIMAIL_REDIS_URL")
        .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    let client = Client::open(url).ok()?;
    client.get_multiplexed_async_connection().await.ok()?;
    Some(client)
}

fn sample_data(email: &str) -> SignupData {
    // ---
    SignupData {
        full_name: "Jane Doe".to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$stub".to_string(),
        signup_ip: "203.0.113.9".to_string(),
    }
}

#[tokio::test]
async fn confirm_consumes_the_record_exactly_once() {
    // ---
    let Some(client) = live_client().await else {
        eprintln!("skipping: no Redis reachable");
        return;
    };

    let store = RedisVerificationStore::new(client, 900);
    let issued = store
        .create(sample_data("redis-confirm@example.com"))
        .await
        .unwrap();

    let data = store.confirm(&issued.token, &issued.code).await.unwrap();
    assert_eq!(data.email, "redis-confirm@example.com");

    let replay = store.confirm(&issued.token, &issued.code).await;
    assert_eq!(replay.unwrap_err(), StoreError::SessionExpired);
}

#[tokio::test]
async fn wrong_code_leaves_the_record_in_place() {
    // ---
    let Some(client) = live_client().await else {
        eprintln!("skipping: no Redis reachable");
        return;
    };

    let store = RedisVerificationStore::new(client, 900);
    let issued = store
        .create(sample_data("redis-mismatch@example.com"))
        .await
        .unwrap();

    let wrong = if issued.code == "000000" { "000001" } else { "000000" };
    let err = store.confirm(&issued.token, wrong).await.unwrap_err();
    assert_eq!(err, StoreError::CodeMismatch);

    assert!(store.confirm(&issued.token, &issued.code).await.is_ok());
}

#[tokio::test]
async fn resend_swaps_the_code_and_keeps_the_session() {
    // ---
    let Some(client) = live_client().await else {
        eprintln!("skipping: no Redis reachable");
        return;
    };

    let store = RedisVerificationStore::new(client, 900);
    let issued = store
        .create(sample_data("redis-resend@example.com"))
        .await
        .unwrap();

    let reissued = store.resend(&issued.token).await.unwrap();
    assert_eq!(reissued.email, "redis-resend@example.com");
    assert!(store.confirm(&issued.token, &reissued.code).await.is_ok());
}

#[tokio::test]
async fn reset_token_is_single_use() {
    // ---
    let Some(client) = live_client().await else {
        eprintln!("skipping: no Redis reachable");
        return;
    };

    let store = RedisResetTokenStore::new(client, 3600);
    let token = store.create("redis-reset@example.com").await.unwrap();

    assert_eq!(store.consume(&token).await.unwrap(), "redis-reset@example.com");
    let err = store.consume(&token).await.unwrap_err();
    assert_eq!(err, StoreError::InvalidOrExpiredToken);
}
