use axum::http::{header, StatusCode};
use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::domain::{mask_email, OutboundEmail};
use crate::handlers::shared_types::{
    api_error, store_error, validation_error, ApiError, UserView,
};
use crate::session::{issue_session_token, session_cookie};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    /// Bearer session token; the same value rides in the HttpOnly cookie.
    pub token: String,
    pub user: UserView,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ResendRequest {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ResendResponse {
    pub message: String,
    /// Masked form of the address the new code went to.
    pub email: String,
}

/// Handler for confirming a pending signup (POST /auth/verify-email/confirm).
///
/// Exchanges a live `{token, code}` pair for a real account plus an
/// authenticated session. The pending record is deleted the moment the code
/// matches, so a replayed confirm reads as an expired session; a mismatch
/// leaves the record in place for another attempt until it expires.
#[tracing::instrument(skip(state, req))]
pub async fn confirm_email(
    State(state): State<AppState>,
    Json(req): Json<ConfirmRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // ---
    if req.token.is_empty() || req.code.is_empty() {
        return Err(validation_error("Token and code are required"));
    }

    let user_data = state
        .verifications()
        .confirm(&req.token, &req.code)
        .await
        .map_err(|err| {
            state.metrics().record_verification_failed();
            store_error(&err)
        })?;

    let full_name = user_data.full_name.clone();
    let email = user_data.email.clone();

    // Two live tokens can exist for one email; the first confirm wins the
    // account and later ones surface AlreadyRegistered.
    let account = state
        .accounts()
        .create_account(user_data)
        .await
        .map_err(|err| {
            state.metrics().record_verification_failed();
            store_error(&err)
        })?;

    let session_token = issue_session_token().map_err(|err| {
        tracing::error!("session issuance failed: {err}");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal",
            "Internal server error",
        )
    })?;

    // The welcome note is a courtesy; delivery never gates the signup.
    match state
        .mailer()
        .send(&OutboundEmail::welcome(
            &email,
            &full_name,
            state.public_base_url(),
        ))
        .await
    {
        Ok(()) => state.metrics().record_email_sent("welcome"),
        Err(err) => {
            state.metrics().record_email_failed("welcome");
            tracing::warn!("welcome email failed: {err}");
        }
    }

    state.metrics().record_verification_confirmed();
    tracing::info!(email = %mask_email(&email), "email verified, account created");

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie(&session_token))],
        Json(ConfirmResponse {
            token: session_token,
            user: UserView::from(account),
            message: "Email verified successfully! Welcome to Verimail.".to_string(),
        }),
    ))
}

/// Handler for reissuing a verification code (POST /auth/verify-email/resend).
///
/// Draws a fresh code, restarts the expiry window, and mails the code to
/// the pending address. The previous code stops working the instant the
/// new one is stored.
#[tracing::instrument(skip(state, req))]
pub async fn resend_code(
    State(state): State<AppState>,
    Json(req): Json<ResendRequest>,
) -> Result<Json<ResendResponse>, ApiError> {
    // ---
    if req.token.is_empty() {
        return Err(validation_error("Token is required"));
    }

    let reissued = state
        .verifications()
        .resend(&req.token)
        .await
        .map_err(|err| store_error(&err))?;

    let message = match state
        .mailer()
        .send(&OutboundEmail::verification_code(
            &reissued.email,
            &reissued.code,
        ))
        .await
    {
        Ok(()) => {
            state.metrics().record_email_sent("verification");
            "New verification code sent.".to_string()
        }
        Err(err) => {
            state.metrics().record_email_failed("verification");
            tracing::warn!("resend email failed: {err}");
            "New code issued, but the email could not be sent. \
             Request another in a moment."
                .to_string()
        }
    };

    state.metrics().record_code_resent();
    tracing::info!(email = %mask_email(&reissued.email), "verification code reissued");

    Ok(Json(ResendResponse {
        message,
        email: mask_email(&reissued.email),
    }))
}
