use axum::http::{header, StatusCode};
use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::domain::{mask_email, normalize_email, verify_password};
use crate::handlers::shared_types::{
    api_error, store_error, validation_error, ApiError, UserView,
};
use crate::session::{issue_session_token, session_cookie};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserView,
}

/// One 401 for both unknown email and wrong password.
fn authentication_failed() -> ApiError {
    // ---
    api_error(
        StatusCode::UNAUTHORIZED,
        "AuthenticationFailed",
        "Invalid email or password",
    )
}

/// Handler for logging in (POST /auth/login).
///
/// Verifies the password against the stored Argon2 hash and issues a fresh
/// session, returned in the body and as an HttpOnly cookie. Accounts only
/// exist once their email is verified, so there is no unverified-login
/// state to handle here.
#[tracing::instrument(skip(state, req))]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // ---
    if req.email.is_empty() || req.password.is_empty() {
        return Err(validation_error("Email and password are required"));
    }

    let account = state
        .accounts()
        .find_by_email(&normalize_email(&req.email))
        .await
        .map_err(|err| store_error(&err))?
        .ok_or_else(authentication_failed)?;

    if !verify_password(&req.password, &account.password_hash) {
        tracing::info!(email = %mask_email(&req.email), "login rejected");
        return Err(authentication_failed());
    }

    let session_token = issue_session_token().map_err(|err| {
        tracing::error!("session issuance failed: {err}");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal",
            "Internal server error",
        )
    })?;

    tracing::info!(email = %mask_email(&account.email), "login succeeded");

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie(&session_token))],
        Json(LoginResponse {
            token: session_token,
            user: UserView::from(account),
        }),
    ))
}
