use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{Duration, Utc};

use crate::domain::{
    generate_code, generate_token, IssuedVerification, PendingVerification, ReissuedCode,
    SignupData, StoreError, StoreResult, VerificationStore,
};

/// In-memory pending-verification store.
///
/// Expiry is enforced lazily at every read and mutation; `sweep_expired`
/// exists so abandoned signups do not accumulate between reads. All
/// mutations happen under one lock, which is what makes a confirm race
/// produce exactly one winner.
pub struct MemoryVerificationStore {
    // ---
    entries: Mutex<HashMap<String, PendingVerification>>,
    ttl: Duration,
}

impl MemoryVerificationStore {
    // ---
    pub fn new(ttl: Duration) -> Self {
        // ---
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    // A poisoned lock means another thread panicked mid-update; the map
    // itself is still consistent, so keep serving.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, PendingVerification>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl VerificationStore for MemoryVerificationStore {
    // ---
    async fn create(&self, user_data: SignupData) -> StoreResult<IssuedVerification> {
        // ---
        let code = generate_code().map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let token = generate_token().map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let record = PendingVerification::new(code.clone(), user_data, Utc::now() + self.ttl);

        self.entries().insert(token.clone(), record);
        Ok(IssuedVerification { token, code })
    }

    async fn lookup(&self, token: &str) -> StoreResult<Option<PendingVerification>> {
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

    async fn confirm(&self, token: &str, supplied_code: &str) -> StoreResult<SignupData> {
        // ---
        let mut entries = self.entries();
        let record = entries.remove(token).ok_or(StoreError::SessionExpired)?;

        if record.is_expired(Utc::now()) {
            return Err(StoreError::CodeExpired);
        }
        if record.code != supplied_code {
            // Mismatch must not burn the session; put the record back so
            // the client can retry with the correct code.
            entries.insert(token.to_string(), record);
            return Err(StoreError::CodeMismatch);
        }

        Ok(record.user_data)
    }

    async fn resend(&self, token: &str) -> StoreResult<ReissuedCode> {
        // ---
        let code = generate_code().map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let mut entries = self.entries();
        let mut record = entries.remove(token).ok_or(StoreError::SessionExpired)?;

        if record.is_expired(Utc::now()) {
            return Err(StoreError::SessionExpired);
        }

        // Old code stops working the moment the new one is issued.
        record.code = code.clone();
        record.expires_at = Utc::now() + self.ttl;
        let email = record.email.clone();
        entries.insert(token.to_string(), record);

        Ok(ReissuedCode { email, code })
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
