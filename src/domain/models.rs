use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Credits granted to every freshly verified account (free tier).
pub const SIGNUP_CREDITS: i64 = 49;

/// Validated signup input held until the email address is proven.
///
/// This is the payload that gets materialized into an [`Account`] when the
/// verification code matches. The password is hashed before it ever enters a
/// pending record, so a dumped store never exposes plaintext credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupData {
    // ---
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub signup_ip: String,
}

/// A signup attempt awaiting its one-time code.
///
/// Keyed externally by an opaque token; the record itself never carries the
/// token so a serialized store dump cannot be replayed against the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingVerification {
    // ---
    /// Zero-padded 6-digit code, compared as an exact string.
    pub code: String,

    /// Case-preserved address the code was mailed to.
    pub email: String,

    /// Signup payload materialized into an account on success.
    pub user_data: SignupData,

    /// Absolute expiry; records read after this instant behave as absent.
    pub expires_at: DateTime<Utc>,
}

impl PendingVerification {
    // ---
    pub fn new(code: String, user_data: SignupData, expires_at: DateTime<Utc>) -> Self {
        // ---
        Self {
            code,
            email: user_data.email.clone(),
            user_data,
            expires_at,
        }
    }

    /// Lazy-expiry predicate used by every read path.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        // ---
        now > self.expires_at
    }
}

/// A password-reset credential: token-keyed, single use, one-hour window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetToken {
    // ---
    /// Lowercase-normalized address the reset was requested for.
    pub email: String,

    /// Absolute expiry; consumed-or-expired both read as absent.
    pub expires_at: DateTime<Utc>,
}

impl ResetToken {
    // ---
    pub fn new(email: String, expires_at: DateTime<Utc>) -> Self {
        // ---
        Self { email, expires_at }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        // ---
        now > self.expires_at
    }
}

/// A fully materialized user account.
///
/// Only ever created through a confirmed verification; `email_verified` is
/// therefore always true for accounts minted by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    // ---
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub credits_balance: i64,
    pub email_verified: bool,
    pub signup_ip: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Builds the account an approved [`SignupData`] payload turns into.
    pub fn materialize(data: SignupData) -> Self {
        // ---
        Self {
            id: Uuid::new_v4(),
            email: data.email,
            full_name: data.full_name,
            password_hash: data.password_hash,
            credits_balance: SIGNUP_CREDITS,
            email_verified: true,
            signup_ip: data.signup_ip,
            created_at: Utc::now(),
        }
    }
}

/// Typed failures surfaced by the stores.
///
/// Handlers translate these into HTTP statuses; the store layer never talks
/// status codes and the handler layer never inspects store internals.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Token was never issued or its record is already gone.
    #[error("verification session expired")]
    SessionExpired,

    /// Record was found but its expiry has passed; the record is removed.
    #[error("verification code expired")]
    CodeExpired,

    /// Record is live but the supplied code is not the current one.
    #[error("invalid verification code")]
    CodeMismatch,

    /// Reset token unknown, already consumed, or expired.
    #[error("invalid or expired reset token")]
    InvalidOrExpiredToken,

    /// An account with this email already exists.
    #[error("email already registered")]
    AlreadyRegistered,

    /// The backing store could not be reached (Redis backend only).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::Duration;

    fn sample_data() -> SignupData {
        // ---
        SignupData {
            full_name: "Jane Doe".to_string(),
            email: "Jane@Company.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            signup_ip: "203.0.113.9".to_string(),
        }
    }

    #[test]
    fn pending_verification_expiry_is_strict() {
        // ---
        let now = Utc::now();
        let pending = PendingVerification::new("042517".to_string(), sample_data(), now);

        // Boundary instant still counts as live; only strictly-after expires.
        assert!(!pending.is_expired(now));
        assert!(pending.is_expired(now + Duration::seconds(1)));
    }

    #[test]
    fn materialized_account_gets_free_credits_and_verified_flag() {
        // ---
        let account = Account::materialize(sample_data());

        assert_eq!(account.credits_balance, SIGNUP_CREDITS);
        assert!(account.email_verified);
        assert_eq!(account.email, "Jane@Company.com");
        assert_eq!(account.signup_ip, "203.0.113.9");
    }

    #[test]
    fn pending_record_round_trips_through_json() {
        // ---
        // The Redis backend persists records as JSON; the wire form must
        // carry every field back unchanged, including the zero-padded code.
        let expires = Utc::now() + Duration::minutes(15);
        let pending = PendingVerification::new("007123".to_string(), sample_data(), expires);

        let json = serde_json::to_string(&pending).unwrap();
        let back: PendingVerification = serde_json::from_str(&json).unwrap();

        assert_eq!(back.code, "007123");
        assert_eq!(back.email, pending.email);
        assert_eq!(back.expires_at, pending.expires_at);
    }
}
