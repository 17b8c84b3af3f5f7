mod account_repository;
mod reset_token_store;
mod verification_store;

#[cfg(test)]
mod tests;

pub use account_repository::RedisAccountRepository;
pub use reset_token_store::RedisResetTokenStore;
pub use verification_store::RedisVerificationStore;

use std::sync::Arc;

use redis::Client;

use crate::domain::{AccountRepositoryPtr, ResetTokenStorePtr, VerificationStorePtr};

/// Creates the Redis-backed verification store. Records expire through
/// native key TTLs of `ttl_seconds`.
pub fn create_redis_verification_store(client: Client, ttl_seconds: u64) -> VerificationStorePtr {
    Arc::new(RedisVerificationStore::new(client, ttl_seconds))
}

/// Creates the Redis-backed reset-token store with the given token lifetime.
pub fn create_redis_reset_token_store(client: Client, ttl_seconds: u64) -> ResetTokenStorePtr {
    Arc::new(RedisResetTokenStore::new(client, ttl_seconds))
}

/// Creates the Redis-backed account repository.
pub fn create_redis_account_repository(client: Client) -> AccountRepositoryPtr {
    Arc::new(RedisAccountRepository::new(client))
}
