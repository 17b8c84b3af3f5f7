use axum::response::IntoResponse;

pub async fn root_handler() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        r#"Welcome to the Verimail auth API 👋
Version: {version}

Available endpoints:
  - POST /auth/signup               - Start a signup (emails a 6-digit code)
  - POST /auth/verify-email/confirm - Confirm a code and create the account
  - POST /auth/verify-email/resend  - Reissue a verification code
  - POST /auth/forgot-password      - Request a password-reset link
  - POST /auth/reset-password       - Reset a password with a valid token
  - POST /auth/login                - Log in with email and password
  - GET  /health                    - Light health check
  - GET  /health?mode=full          - Full health check (includes Redis when active)
  - GET  /metrics                   - Metrics in Prometheus text format

No account exists until its email address is verified; signups are parked
as pending verifications with a 15-minute window.
"#
    )
}
