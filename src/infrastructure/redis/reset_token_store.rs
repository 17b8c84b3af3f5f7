use chrono::{Duration, Utc};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};

use crate::domain::{generate_token, ResetToken, ResetTokenStore, StoreError, StoreResult};

const KEY_PREFIX: &str = "reset:";

/// Redis-backed password-reset token store.
///
/// Tokens live under `reset:{token}` with a native key TTL. `consume` is a
/// single GETDEL, which is what makes each token single-use even when two
/// resets race.
pub struct RedisResetTokenStore {
    // ---
    client: Client,
    ttl_seconds: u64,
}

impl RedisResetTokenStore {
    // ---
    pub fn new(client: Client, ttl_seconds: u64) -> Self {
        // ---
        Self {
            client,
            ttl_seconds,
        }
    }

    async fn conn(&self) -> StoreResult<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    fn key(token: &str) -> String {
        format!("{KEY_PREFIX}{token}")
    }
}

#[async_trait::async_trait]
impl ResetTokenStore for RedisResetTokenStore {
    // ---
    async fn create(&self, email: &str) -> StoreResult<String> {
        // ---
        let token = generate_token().map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let expires_at = Utc::now() + Duration::seconds(self.ttl_seconds as i64);
        let record = ResetToken::new(email.to_string(), expires_at);
        let json =
            serde_json::to_string(&record).map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(Self::key(&token), json, self.ttl_seconds)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(token)
    }

    async fn lookup(&self, token: &str) -> StoreResult<Option<ResetToken>> {
        // ---
        let mut conn = self.conn().await?;
        let raw: Option<String> = conn
            .get(Self::key(token))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        match raw {
            Some(json) => match serde_json::from_str(&json) {
                Ok(record) => Ok(Some(record)),
                Err(e) => {
                    tracing::warn!("dropping unreadable reset token record: {e}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn consume(&self, token: &str) -> StoreResult<String> {
        // ---
        let mut conn = self.conn().await?;
        let raw: Option<String> = conn
            .get_del(Self::key(token))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let json = raw.ok_or(StoreError::InvalidOrExpiredToken)?;
        let record: ResetToken =
            serde_json::from_str(&json).map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(record.email)
    }

    async fn sweep_expired(&self) -> StoreResult<usize> {
        // Redis evicts expired keys natively; there is nothing to walk.
        Ok(0)
    }
}
