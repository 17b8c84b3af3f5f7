use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, Script};

use crate::domain::{
    normalize_email, Account, AccountRepository, SignupData, StoreError, StoreResult,
};

const KEY_PREFIX: &str = "account:";

// Read-modify-write of the stored hash in one server-side step. Returns 1
// when the account existed and was updated, 0 otherwise.
const UPDATE_PASSWORD_SCRIPT: &str = r#"
local raw = redis.call('GET', KEYS[1])
if not raw then return 0 end
local ok, account = pcall(cjson.decode, raw)
if not ok then return 0 end
account.password_hash = ARGV[1]
redis.call('SET', KEYS[1], cjson.encode(account))
return 1
"#;

/// Redis-backed account repository, keyed by normalized email.
///
/// Accounts are written with `SET NX`, so the uniqueness check and the
/// insert are one atomic step; two confirms racing on the same email
/// materialize exactly one account. Account keys carry no TTL.
pub struct RedisAccountRepository {
    // ---
    client: Client,
    update_password: Script,
}

impl RedisAccountRepository {
    // ---
    pub fn new(client: Client) -> Self {
        // ---
        Self {
            client,
            update_password: Script::new(UPDATE_PASSWORD_SCRIPT),
        }
    }

    async fn conn(&self) -> StoreResult<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    fn key(email: &str) -> String {
        format!("{KEY_PREFIX}{}", normalize_email(email))
    }
}

#[async_trait::async_trait]
impl AccountRepository for RedisAccountRepository {
    // ---
    async fn create_account(&self, data: SignupData) -> StoreResult<Account> {
        // ---
        let account = Account::materialize(data);
        let json =
            serde_json::to_string(&account).map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let mut conn = self.conn().await?;
        let inserted: bool = conn
            .set_nx(Self::key(&account.email), json)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if !inserted {
            return Err(StoreError::AlreadyRegistered);
        }

        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        // ---
        let mut conn = self.conn().await?;
        let raw: Option<String> = conn
            .get(Self::key(email))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        match raw {
            Some(json) => match serde_json::from_str(&json) {
                Ok(account) => Ok(Some(account)),
                Err(e) => {
                    tracing::warn!("dropping unreadable account record: {e}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn update_password(&self, email: &str, password_hash: &str) -> StoreResult<bool> {
        // ---
        let mut conn = self.conn().await?;
        let updated: i64 = self
            .update_password
            .key(Self::key(email))
            .arg(password_hash)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(updated == 1)
    }
}
