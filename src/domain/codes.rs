//! One-time code and opaque token generation.
//!
//! Both draws come from the operating system RNG. Guessability of either
//! value directly gates account takeover, so predictable generators are not
//! acceptable here and failures surface as errors instead of falling back.

use anyhow::{Context, Result};
use rand::{rngs::OsRng, RngCore};

/// Number of decimal digits in a verification code.
pub const CODE_LENGTH: usize = 6;

/// Generate a uniformly random 6-digit code, leading zeros included.
///
/// Codes are compared as exact zero-padded strings, never as parsed
/// integers, so `"012345"` is a distinct (and equally likely) value.
pub fn generate_code() -> Result<String> {
    // ---
    const RANGE: u64 = 1_000_000;
    // Largest multiple of RANGE representable in u64; draws at or above it
    // are rejected to keep the modulo step unbiased.
    const LIMIT: u64 = u64::MAX - (u64::MAX % RANGE);

    loop {
        let mut bytes = [0u8; 8];
        OsRng
            .try_fill_bytes(&mut bytes)
            .context("failed to draw verification code")?;

        let value = u64::from_le_bytes(bytes);
        if value < LIMIT {
            return Ok(format!("{:06}", value % RANGE));
        }
    }
}

/// Generate a 256-bit opaque token, hex-encoded (64 chars, URL-safe).
///
/// Used as the external identifier for pending verifications and reset
/// tokens. Drawn independently of any code and carries no decodable
/// structure.
pub fn generate_token() -> Result<String> {
    // ---
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate opaque token")?;

    Ok(hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn codes_are_six_ascii_digits() {
        // ---
        for _ in 0..256 {
            let code = generate_code().unwrap();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()), "bad code {code}");
        }
    }

    #[test]
    fn tokens_are_64_hex_chars_of_32_bytes() {
        // ---
        let token = generate_token().unwrap();
        assert_eq!(token.len(), 64);

        let decoded = hex::decode(&token).unwrap();
        assert_eq!(decoded.len(), 32);
    }

    #[test]
    fn tokens_do_not_repeat() {
        // ---
        let a = generate_token().unwrap();
        let b = generate_token().unwrap();
        assert_ne!(a, b);
    }
}
