use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::domain::{
    hash_password, is_disposable, mask_email, normalize_email, valid_email, OutboundEmail,
    SignupData, MIN_PASSWORD_LENGTH, UNKNOWN_CLIENT_IP,
};
use crate::handlers::shared_types::{api_error, store_error, validation_error, ApiError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    // Missing fields deserialize as empty and fail validation with a 400
    // instead of bubbling up as an extractor rejection.
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    #[serde(rename = "requiresVerification")]
    pub requires_verification: bool,
    #[serde(rename = "verificationToken")]
    pub verification_token: String,
    /// Masked form of the address the code was mailed to.
    pub email: String,
    pub message: String,
}

/// Best-effort client IP, read from proxy headers.
///
/// Takes the first hop in `x-forwarded-for`, falls back to `x-real-ip`,
/// and finally to the shared [`UNKNOWN_CLIENT_IP`] bucket so addressless
/// requests never each get a fresh rate-limit window.
pub(crate) fn client_ip(headers: &HeaderMap) -> String {
    // ---
    if let Some(forwarded) = headers.get("x-forwarded-for") {
        if let Ok(value) = forwarded.to_str() {
            if let Some(first) = value.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return first.to_string();
                }
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(value) = real_ip.to_str() {
            let value = value.trim();
            if !value.is_empty() {
                return value.to_string();
            }
        }
    }

    UNKNOWN_CLIENT_IP.to_string()
}

/// Handler for starting a signup (POST /auth/signup).
///
/// Validates the payload, checks the per-IP budget, and parks the signup as
/// a pending verification instead of creating an account:
///
/// - `429` when the caller's IP has exhausted its signup window.
/// - `400` on missing fields, short password, malformed or disposable email,
///   or an email that already has an account.
/// - `201` with the verification token once the code email is dispatched.
///
/// The code itself only ever travels by email; the response carries the
/// token and a masked copy of the address.
#[tracing::instrument(skip(state, headers, req))]
pub async fn signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    // ---
    let ip = client_ip(&headers);

    if !state.rate_limiter().check(&ip).await {
        state.metrics().record_signup_rate_limited();
        tracing::warn!(ip = %ip, "signup rate limited");
        return Err(api_error(
            StatusCode::TOO_MANY_REQUESTS,
            "RateLimited",
            "Too many signup attempts. Please try again later.",
        ));
    }

    // Delivery keeps the address as typed; checks use the normalized form.
    let full_name = req.full_name.trim().to_string();
    let email = req.email.trim().to_string();
    let normalized = normalize_email(&req.email);

    if full_name.is_empty() || email.is_empty() || req.password.is_empty() {
        state.metrics().record_signup_rejected();
        return Err(validation_error("All fields are required"));
    }
    if req.password.chars().count() < MIN_PASSWORD_LENGTH {
        state.metrics().record_signup_rejected();
        return Err(validation_error(
            "Password must be at least 8 characters",
        ));
    }
    if !valid_email(&normalized) {
        state.metrics().record_signup_rejected();
        return Err(validation_error("Please enter a valid email address"));
    }
    if is_disposable(&normalized) {
        state.metrics().record_signup_rejected();
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Rejected",
            "Disposable email addresses are not allowed. Please use a permanent email.",
        ));
    }

    match state.accounts().find_by_email(&normalized).await {
        Ok(Some(_)) => {
            state.metrics().record_signup_rejected();
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "AlreadyRegistered",
                "Email already registered",
            ));
        }
        Ok(None) => {}
        Err(err) => return Err(store_error(&err)),
    }

    let password_hash = hash_password(&req.password).map_err(|err| {
        tracing::error!("password hashing failed: {err}");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal",
            "Internal server error",
        )
    })?;

    let issued = state
        .verifications()
        .create(SignupData {
            full_name,
            email: email.clone(),
            password_hash,
            signup_ip: ip,
        })
        .await
        .map_err(|err| store_error(&err))?;

    // The pending record is committed; a delivery failure is recoverable
    // through the resend flow, so it only changes the message copy.
    let message = match state
        .mailer()
        .send(&OutboundEmail::verification_code(&email, &issued.code))
        .await
    {
        Ok(()) => {
            state.metrics().record_email_sent("verification");
            "Verification code sent to your email.".to_string()
        }
        Err(err) => {
            state.metrics().record_email_failed("verification");
            tracing::warn!("verification email failed: {err}");
            "Signup received, but the verification email could not be sent. \
             Request a new code in a moment."
                .to_string()
        }
    };

    state.metrics().record_signup_started();
    tracing::info!(email = %mask_email(&email), "signup pending verification");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            requires_verification: true,
            verification_token: issued.token,
            email: mask_email(&email),
            message,
        }),
    ))
}
