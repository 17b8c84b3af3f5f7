//! Outbound email seam and the message templates the auth flows send.
//!
//! Templates render the full message here in the domain layer; mailer
//! implementations only move bytes. The sender address belongs to the
//! implementation's config, so [`OutboundEmail`] carries no `from` field.

use std::sync::Arc;

use anyhow::Result;

use crate::domain::models::SIGNUP_CREDITS;

/// A fully rendered message, ready for any [`Mailer`] to deliver.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl OutboundEmail {
    /// Verification-code message sent on signup and on resend.
    pub fn verification_code(to: &str, code: &str) -> Self {
        // ---
        let html = format!(
            r#"<div style="font-family: sans-serif; max-width: 480px; margin: 0 auto;">
  <h1>Verify your email</h1>
  <p>Enter this code to complete your registration:</p>
  <p style="font-size: 32px; letter-spacing: 8px; font-weight: 700;">{code}</p>
  <p>This code expires in 15 minutes.</p>
  <p style="color: #666;">If you didn't request this code, you can safely ignore this email.</p>
</div>"#
        );
        let text = format!(
            "Your Verimail verification code is: {code}\n\n\
             This code expires in 15 minutes.\n\n\
             If you didn't request this code, you can safely ignore this email."
        );

        Self {
            to: to.to_string(),
            subject: "Verify your email - Verimail".to_string(),
            html,
            text,
        }
    }

    /// Welcome message sent once a signup is confirmed. Links to the
    /// dashboard under `base_url`.
    pub fn welcome(to: &str, full_name: &str, base_url: &str) -> Self {
        // ---
        let dashboard = format!("{base_url}/dashboard");
        let html = format!(
            r#"<div style="font-family: sans-serif; max-width: 480px; margin: 0 auto;">
  <h1>Welcome, {full_name}!</h1>
  <p>Your account is now verified and ready to use.</p>
  <p>You have <strong>{SIGNUP_CREDITS}</strong> free credits to start.</p>
  <p><a href="{dashboard}">Go to your dashboard</a></p>
</div>"#
        );
        let text = format!(
            "Welcome to Verimail, {full_name}!\n\n\
             Your account is verified. You have {SIGNUP_CREDITS} free credits to start.\n\n\
             Go to your dashboard: {dashboard}"
        );

        Self {
            to: to.to_string(),
            subject: "Welcome to Verimail!".to_string(),
            html,
            text,
        }
    }

    /// Password-reset message. `reset_link` is the complete URL including
    /// the token; the caller builds it because only the caller knows it.
    pub fn password_reset(to: &str, reset_link: &str) -> Self {
        // ---
        let html = format!(
            r#"<div style="font-family: sans-serif; max-width: 480px; margin: 0 auto;">
  <h1>Reset your password</h1>
  <p>Click the link below to reset your password:</p>
  <p><a href="{reset_link}">Reset password</a></p>
  <p>This link expires in 1 hour.</p>
  <p style="color: #666;">If you didn't request this, you can safely ignore this email.</p>
</div>"#
        );
        let text = format!(
            "Reset your Verimail password:\n\n{reset_link}\n\n\
             This link expires in 1 hour.\n\n\
             If you didn't request this, you can safely ignore this email."
        );

        Self {
            to: to.to_string(),
            subject: "Reset your password - Verimail".to_string(),
            html,
            text,
        }
    }
}

// ---

/// Message delivery seam.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message.
    ///
    /// Callers dispatch after their store commit and treat failures as
    /// log-and-continue; an error here must never roll back state the
    /// user can recover through the resend flow.
    async fn send(&self, message: &OutboundEmail) -> Result<()>;
}

/// Shared ownership alias used for dependency injection.
pub type MailerPtr = Arc<dyn Mailer>;
