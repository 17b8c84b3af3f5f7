use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{Duration, Utc};

use crate::domain::{generate_token, ResetToken, ResetTokenStore, StoreError, StoreResult};

/// In-memory password-reset token store.
///
/// Tokens are single-use: `consume` removes the record whether or not it
/// is still live. Requesting a reset twice leaves two independent live
/// tokens; neither invalidates the other.
pub struct MemoryResetTokenStore {
    // ---
    entries: Mutex<HashMap<String, ResetToken>>,
    ttl: Duration,
}

impl MemoryResetTokenStore {
    // ---
    pub fn new(ttl: Duration) -> Self {
        // ---
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, ResetToken>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl ResetTokenStore for MemoryResetTokenStore {
    // ---
    async fn create(&self, email: &str) -> StoreResult<String> {
        // ---
        let token = generate_token().map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let record = ResetToken::new(email.to_string(), Utc::now() + self.ttl);

        self.entries().insert(token.clone(), record);
        Ok(token)
    }

    async fn lookup(&self, token: &str) -> StoreResult<Option<ResetToken>> {
        // ---
        let mut entries = self.entries();
        match entries.get(token) {
            Some(record) if record.is_expired(Utc::now()) => {
                entries.remove(token);
                Ok(None)
            }
            Some(record) => Ok(Some(record.clone())),
            None => Ok(None),
        }
    }

    async fn consume(&self, token: &str) -> StoreResult<String> {
        // ---
        let record = self
            .entries()
            .remove(token)
            .ok_or(StoreError::InvalidOrExpiredToken)?;

        if record.is_expired(Utc::now()) {
            return Err(StoreError::InvalidOrExpiredToken);
        }

        Ok(record.email)
    }

    async fn sweep_expired(&self) -> StoreResult<usize> {
        // ---
        let now = Utc::now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, record| !record.is_expired(now));

        Ok(before - entries.len())
    }
}
