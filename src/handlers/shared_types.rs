use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Account, StoreError};

/// Error body returned by every failing endpoint: a stable machine-readable
/// kind plus a human-readable message. The kind never encodes whether an
/// email exists; the message copy is what the product shows users.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// The `(status, body)` pair axum turns into a failure response.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Builds a failure response from its parts.
pub fn api_error(status: StatusCode, kind: &str, message: impl Into<String>) -> ApiError {
    // ---
    (
        status,
        Json(ErrorResponse {
            error: kind.to_string(),
            message: message.into(),
        }),
    )
}

/// 400 with kind `ValidationError`: missing or malformed request fields.
pub fn validation_error(message: impl Into<String>) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "ValidationError", message)
}

/// Maps a typed store failure onto the HTTP wire shape.
///
/// Unknown-token and expired-record cases both surface as `SessionExpired`;
/// callers cannot tell them apart, only the message copy differs.
pub fn store_error(err: &StoreError) -> ApiError {
    // ---
    match err {
        StoreError::SessionExpired => api_error(
            StatusCode::BAD_REQUEST,
            "SessionExpired",
            "Verification session expired. Please sign up again.",
        ),
        StoreError::CodeExpired => api_error(
            StatusCode::BAD_REQUEST,
            "SessionExpired",
            "Verification code expired. Please sign up again.",
        ),
        StoreError::CodeMismatch => api_error(
            StatusCode::BAD_REQUEST,
            "CodeMismatch",
            "Invalid verification code.",
        ),
        StoreError::InvalidOrExpiredToken => api_error(
            StatusCode::BAD_REQUEST,
            "InvalidOrExpiredToken",
            "Invalid or expired reset token",
        ),
        StoreError::AlreadyRegistered => api_error(
            StatusCode::BAD_REQUEST,
            "AlreadyRegistered",
            "Email already registered",
        ),
        StoreError::Unavailable(detail) => {
            tracing::error!("store unavailable: {detail}");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal",
                "Internal server error",
            )
        }
    }
}

/// Public view of an account, embedded in confirm and login responses.
///
/// Deliberately omits the password hash and the signup IP.
#[derive(Debug, Serialize)]
pub struct UserView {
    // ---
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub credits_balance: i64,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for UserView {
    fn from(account: Account) -> Self {
        // ---
        Self {
            id: account.id,
            email: account.email,
            full_name: account.full_name,
            credits_balance: account.credits_balance,
            email_verified: account.email_verified,
            created_at: account.created_at,
        }
    }
}
