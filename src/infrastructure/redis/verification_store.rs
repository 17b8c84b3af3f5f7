use chrono::{Duration, Utc};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, Script};

use crate::domain::{
    generate_code, generate_token, IssuedVerification, PendingVerification, ReissuedCode,
    SignupData, StoreError, StoreResult, VerificationStore,
};

const KEY_PREFIX: &str = "verify:";

// Compare-and-consume in one server-side step. Returns nil when the key is
// gone, an empty string on code mismatch (record untouched), and the full
// record JSON on success (record deleted).
const CONFIRM_SCRIPT: &str = r#"
local raw = redis.call('GET', KEYS[1])
if not raw then return nil end
local ok, record = pcall(cjson.decode, raw)
if not ok then
    redis.call('DEL', KEYS[1])
    return nil
end
if record.code ~= ARGV[1] then return '' end
redis.call('DEL', KEYS[1])
return raw
"#;

// Swap in a fresh code and expiry without losing a concurrent confirm's
// delete: the whole read-modify-write runs inside the script. Returns the
// record's email, or nil when the key is gone.
const RESEND_SCRIPT: &str = r#"
local raw = redis.call('GET', KEYS[1])
if not raw then return nil end
local ok, record = pcall(cjson.decode, raw)
if not ok then
    redis.call('DEL', KEYS[1])
    return nil
end
record.code = ARGV[1]
record.expires_at = ARGV[2]
redis.call('SET', KEYS[1], cjson.encode(record), 'EX', tonumber(ARGV[3]))
return record.email
"#;

/// Redis-backed pending-verification store.
///
/// Records live under `verify:{token}` with a native key TTL, so Redis
/// itself removes expired sessions and a present key is always live. The
/// multi-step mutations run as Lua scripts to keep the confirm race down
/// to exactly one winner, same as the in-memory backend.
pub struct RedisVerificationStore {
    // ---
    client: Client,
    ttl_seconds: u64,
    confirm: Script,
    resend: Script,
}

impl RedisVerificationStore {
    // ---
    pub fn new(client: Client, ttl_seconds: u64) -> Self {
        // ---
        Self {
            client,
            ttl_seconds,
            confirm: Script::new(CONFIRM_SCRIPT),
            resend: Script::new(RESEND_SCRIPT),
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
impl VerificationStore for RedisVerificationStore {
    // ---
    async fn create(&self, user_data: SignupData) -> StoreResult<IssuedVerification> {
        // ---
        let code = generate_code().map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let token = generate_token().map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let expires_at = Utc::now() + Duration::seconds(self.ttl_seconds as i64);
        let record = PendingVerification::new(code.clone(), user_data, expires_at);
        let json =
            serde_json::to_string(&record).map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(Self::key(&token), json, self.ttl_seconds)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(IssuedVerification { token, code })
    }

    async fn lookup(&self, token: &str) -> StoreResult<Option<PendingVerification>> {
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
                    tracing::warn!("dropping unreadable verification record: {e}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn confirm(&self, token: &str, supplied_code: &str) -> StoreResult<SignupData> {
        // ---
        let mut conn = self.conn().await?;
        let outcome: Option<String> = self
            .confirm
            .key(Self::key(token))
            .arg(supplied_code)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        match outcome {
            None => Err(StoreError::SessionExpired),
            Some(raw) if raw.is_empty() => Err(StoreError::CodeMismatch),
            Some(raw) => {
                let record: PendingVerification = serde_json::from_str(&raw)
                    .map_err(|e| StoreError::Unavailable(e.to_string()))?;
                Ok(record.user_data)
            }
        }
    }

    async fn resend(&self, token: &str) -> StoreResult<ReissuedCode> {
        // ---
        let code = generate_code().map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let expires_at = Utc::now() + Duration::seconds(self.ttl_seconds as i64);

        let mut conn = self.conn().await?;
        let email: Option<String> = self
            .resend
            .key(Self::key(token))
            .arg(&code)
            .arg(expires_at.to_rfc3339())
            .arg(self.ttl_seconds)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        match email {
            Some(email) => Ok(ReissuedCode { email, code }),
            None => Err(StoreError::SessionExpired),
        }
    }

    async fn sweep_expired(&self) -> StoreResult<usize> {
        // Redis evicts expired keys natively; there is nothing to walk.
        Ok(0)
    }
}
