use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::{
    normalize_email, Account, AccountRepository, SignupData, StoreError, StoreResult,
};

/// In-memory account repository, keyed by normalized email.
///
/// The uniqueness check and the insert happen under one lock, so two
/// confirmed verifications racing on the same email materialize exactly
/// one account. The stored account keeps the address as the user typed
/// it; only the key is normalized.
pub struct MemoryAccountRepository {
    // ---
    accounts: Mutex<HashMap<String, Account>>,
}

impl MemoryAccountRepository {
    // ---
    pub fn new() -> Self {
        // ---
        Self {
            accounts: Mutex::new(HashMap::new()),
        }
    }

    fn accounts(&self) -> MutexGuard<'_, HashMap<String, Account>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AccountRepository for MemoryAccountRepository {
    // ---
    async fn create_account(&self, data: SignupData) -> StoreResult<Account> {
        // ---
        let key = normalize_email(&data.email);
        let mut accounts = self.accounts();
        if accounts.contains_key(&key) {
            return Err(StoreError::AlreadyRegistered);
        }

        let account = Account::materialize(data);
        accounts.insert(key, account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        // ---
        Ok(self.accounts().get(&normalize_email(email)).cloned())
    }

    async fn update_password(&self, email: &str, password_hash: &str) -> StoreResult<bool> {
        // ---
        match self.accounts().get_mut(&normalize_email(email)) {
            Some(account) => {
                account.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
