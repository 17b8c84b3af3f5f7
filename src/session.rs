//! Session issuance for authenticated users.
//!
//! A session here is an opaque bearer token handed out after a confirmed
//! signup or a successful login, returned both in the JSON body and as an
//! HttpOnly cookie. The token is a raw 256-bit random value; it carries no
//! decodable structure and is not derived from any account attribute.

use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

// ---

/// Session token time-to-live in seconds (7 days).
const SESSION_TTL_SECONDS: u64 = 604_800;

/// Cookie the session token travels in.
const SESSION_COOKIE_NAME: &str = "token";

// ---

/// Issues a fresh session token: 32 random bytes, base64url without
/// padding (43 characters).
pub fn issue_session_token() -> Result<String> {
    // ---
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session token")?;

    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Builds the `Set-Cookie` value carrying a session token.
///
/// HttpOnly keeps the token away from scripts; SameSite=Lax matches the
/// browser flows this API serves (top-level navigations after email
/// links).
pub fn session_cookie(token: &str) -> String {
    // ---
    format!(
        "{SESSION_COOKIE_NAME}={token}; HttpOnly; SameSite=Lax; Max-Age={SESSION_TTL_SECONDS}; Path=/"
    )
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn tokens_are_43_chars_of_base64url() {
        // ---
        let token = issue_session_token().unwrap();
        assert_eq!(token.len(), 43);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));

        let decoded = URL_SAFE_NO_PAD.decode(token.as_bytes()).unwrap();
        assert_eq!(decoded.len(), 32);
    }

    #[test]
    fn tokens_do_not_repeat() {
        // ---
        assert_ne!(
            issue_session_token().unwrap(),
            issue_session_token().unwrap()
        );
    }

    #[test]
    fn cookie_carries_token_and_attributes() {
        // ---
        let cookie = session_cookie("abc123");
        assert!(cookie.starts_with("token=abc123; "));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(cookie.contains("Path=/"));
    }
}
