mod codes;
mod email;
mod mailer;
mod metrics;
mod models;
mod password;
mod rate_limit;
mod stores;

// Publicly expose the Metrics abstraction
pub use metrics::{Metrics, MetricsPtr};

// Publicly expose the store seams and their records
pub use models::{
    Account, PendingVerification, ResetToken, SignupData, StoreError, SIGNUP_CREDITS,
};
pub use stores::{
    AccountRepository, AccountRepositoryPtr, IssuedVerification, ReissuedCode, ResetTokenStore,
    ResetTokenStorePtr, StoreResult, VerificationStore, VerificationStorePtr,
};

// Publicly expose rate limiting and mail dispatch
pub use mailer::{Mailer, MailerPtr, OutboundEmail};
pub use rate_limit::{RateLimiter, RateLimiterPtr, UNKNOWN_CLIENT_IP};

// Publicly expose the pure helpers handlers validate with
pub use codes::{generate_code, generate_token, CODE_LENGTH};
pub use email::{is_disposable, mask_email, normalize_email, valid_email};
pub use password::{hash_password, verify_password, MIN_PASSWORD_LENGTH};
