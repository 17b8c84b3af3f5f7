use axum::http::StatusCode;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::domain::{
    hash_password, mask_email, normalize_email, OutboundEmail, MIN_PASSWORD_LENGTH,
};
use crate::handlers::shared_types::{api_error, store_error, validation_error, ApiError};
use crate::AppState;

/// The one body forgot-password ever returns with a 200.
const RESET_SENT_MESSAGE: &str = "If the email exists, a reset link has been sent";

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ForgotPasswordResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordResponse {
    pub success: bool,
    pub message: String,
}

/// Handler for requesting a password reset (POST /auth/forgot-password).
///
/// Issues a single-use token and mails a reset link. The response is the
/// same fixed body no matter what happened inside — whether the address has
/// an account, and even when the store or mailer fails — so this endpoint
/// cannot be used to probe which emails are registered. Only a missing
/// email field gets a 400.
#[tracing::instrument(skip(state, req))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, ApiError> {
    // ---
    let email = req.email.trim().to_string();
    if email.is_empty() {
        return Err(validation_error("Email is required"));
    }

    state.metrics().record_reset_requested();

    match state.reset_tokens().create(&normalize_email(&email)).await {
        Ok(token) => {
            let reset_link = format!(
                "{}/reset-password?token={}",
                state.public_base_url(),
                token
            );
            match state
                .mailer()
                .send(&OutboundEmail::password_reset(&email, &reset_link))
                .await
            {
                Ok(()) => state.metrics().record_email_sent("password_reset"),
                Err(err) => {
                    state.metrics().record_email_failed("password_reset");
                    tracing::warn!("password reset email failed: {err}");
                }
            }
        }
        // Fail open: an internal error must not change the response shape.
        Err(err) => tracing::error!("reset token creation failed: {err}"),
    }

    tracing::info!(email = %mask_email(&email), "password reset requested");

    Ok(Json(ForgotPasswordResponse {
        success: true,
        message: RESET_SENT_MESSAGE.to_string(),
    }))
}

/// Handler for completing a password reset (POST /auth/reset-password).
///
/// Consumes the token (single use is enforced by the deletion) and replaces
/// the account's password hash. A token whose address has no account still
/// reports success; only the token itself gates this endpoint, so the reset
/// flow reveals nothing the forgot flow kept hidden.
#[tracing::instrument(skip(state, req))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<ResetPasswordResponse>, ApiError> {
    // ---
    if req.token.is_empty() || req.password.is_empty() {
        return Err(validation_error("Token and password are required"));
    }
    if req.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(validation_error("Password must be at least 8 characters"));
    }

    // Validation happens before this point so a failed request never burns
    // the token.
    let email = state
        .reset_tokens()
        .consume(&req.token)
        .await
        .map_err(|err| store_error(&err))?;

    let password_hash = hash_password(&req.password).map_err(|err| {
        tracing::error!("password hashing failed: {err}");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal",
            "Internal server error",
        )
    })?;

    match state.accounts().update_password(&email, &password_hash).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::info!(email = %mask_email(&email), "reset consumed for address without account");
        }
        Err(err) => tracing::error!("password update failed: {err}"),
    }

    state.metrics().record_reset_completed();
    tracing::info!(email = %mask_email(&email), "password reset completed");

    Ok(Json(ResetPasswordResponse {
        success: true,
        message: "Password has been reset successfully".to_string(),
    }))
}
