use super::models::{Account, PendingVerification, ResetToken, SignupData, StoreError};
use std::sync::Arc;

/// Store operations either succeed or return a typed failure; there is no
/// partial-failure state inside a store.
pub type StoreResult<T> = Result<T, StoreError>;

/// Identifiers handed back when a pending verification is created.
///
/// Token and code are drawn independently: knowing one must not narrow the
/// search space of the other.
#[derive(Debug, Clone)]
pub struct IssuedVerification {
    // ---
    pub token: String,
    pub code: String,
}

/// Result of re-drawing a code for an existing pending verification.
#[derive(Debug, Clone)]
pub struct ReissuedCode {
    // ---
    pub email: String,
    pub code: String,
}

/// Abstraction over the pending-verification registry.
///
/// Implementations must make each mutating call atomic with respect to a
/// single token: two concurrent `confirm` calls for one token must yield
/// exactly one success. Expiry is enforced lazily on every read; physical
/// deletion may additionally happen in `sweep_expired`.
#[async_trait::async_trait]
pub trait VerificationStore: Send + Sync {
    // ---
    /// Create a pending record and return its fresh token/code pair.
    async fn create(&self, user_data: SignupData) -> StoreResult<IssuedVerification>;

    /// Return the live record for `token`, treating expired records as
    /// absent (and evicting them where the backend allows).
    async fn lookup(&self, token: &str) -> StoreResult<Option<PendingVerification>>;

    /// Consume the record if `supplied_code` matches exactly.
    ///
    /// A mismatch leaves the record in place so the user may retry until
    /// expiry; a match deletes it so the token can never be replayed.
    async fn confirm(&self, token: &str, supplied_code: &str) -> StoreResult<SignupData>;

    /// Replace the code and push the expiry window forward, invalidating the
    /// previous code the instant the new one is stored.
    async fn resend(&self, token: &str) -> StoreResult<ReissuedCode>;

    /// Physically remove expired records; returns how many were evicted.
    async fn sweep_expired(&self) -> StoreResult<usize>;
}

/// Abstraction over the password-reset token registry.
///
/// Same lifecycle shape as [`VerificationStore`] but single-use-on-success
/// instead of code-matched.
#[async_trait::async_trait]
pub trait ResetTokenStore: Send + Sync {
    // ---
    /// Create a reset token bound to `email`.
    async fn create(&self, email: &str) -> StoreResult<String>;

    /// Return the live record for `token`; expired/unknown read as absent.
    async fn lookup(&self, token: &str) -> StoreResult<Option<ResetToken>>;

    /// Delete the record and return its email — single use is enforced by
    /// the deletion itself.
    async fn consume(&self, token: &str) -> StoreResult<String>;

    /// Physically remove expired records; returns how many were evicted.
    async fn sweep_expired(&self) -> StoreResult<usize>;
}

/// Abstraction over materialized accounts.
///
/// In production the real user base lives behind this seam; the in-memory
/// implementation is authoritative for tests and single-node deployments.
/// Accounts are keyed by normalized email; implementations normalize
/// internally, so callers may pass the address as the user typed it.
#[async_trait::async_trait]
pub trait AccountRepository: Send + Sync {
    // ---
    /// Materialize an account from an approved signup payload; fails with
    /// `AlreadyRegistered` when the email is already taken. The uniqueness
    /// check and the insert are one atomic step.
    async fn create_account(&self, data: SignupData) -> StoreResult<Account>;

    /// Look up an account by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>>;

    /// Replace the stored password hash; `Ok(false)` when no such account
    /// exists (callers stay fail-open for anti-enumeration).
    async fn update_password(&self, email: &str, password_hash: &str) -> StoreResult<bool>;
}

/// Type aliases for any backend implementing the store traits.
pub type VerificationStorePtr = Arc<dyn VerificationStore>;
pub type ResetTokenStorePtr = Arc<dyn ResetTokenStore>;
pub type AccountRepositoryPtr = Arc<dyn AccountRepository>;
