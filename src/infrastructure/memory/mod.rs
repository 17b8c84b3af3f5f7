mod account_repository;
mod reset_token_store;
mod verification_store;

pub use account_repository::MemoryAccountRepository;
pub use reset_token_store::MemoryResetTokenStore;
pub use verification_store::MemoryVerificationStore;

use std::sync::Arc;

use chrono::Duration;

use crate::domain::{AccountRepositoryPtr, ResetTokenStorePtr, VerificationStorePtr};

/// Creates the in-memory verification store. `ttl_seconds` bounds the
/// lifetime of every pending record issued through it.
pub fn create_memory_verification_store(ttl_seconds: u64) -> VerificationStorePtr {
    Arc::new(MemoryVerificationStore::new(Duration::seconds(
        ttl_seconds as i64,
    )))
}

/// Creates the in-memory reset-token store with the given token lifetime.
pub fn create_memory_reset_token_store(ttl_seconds: u64) -> ResetTokenStorePtr {
    Arc::new(MemoryResetTokenStore::new(Duration::seconds(
        ttl_seconds as i64,
    )))
}

/// Creates the in-memory account repository.
pub fn create_memory_account_repository() -> AccountRepositoryPtr {
    Arc::new(MemoryAccountRepository::new())
}
