//! Email address normalization, validation, masking, and the disposable
//! domain denylist.
//!
//! Checks and store keys always use the normalized form, so `Foo@Bar.COM `
//! and `foo@bar.com` land on the same records; delivery keeps the address
//! as the user typed it.

use once_cell::sync::Lazy;
use regex::Regex;

// ---
// Shape check only: one `@`, non-empty local part, dotted domain. Anything
// stricter belongs to the mail provider, which gets the final say anyway.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex must compile")
});

// Throwaway providers rejected at signup. Domains are matched exactly
// against the normalized address, not by suffix.
const DISPOSABLE_DOMAINS: &[&str] = &[
    "tempmail.com",
    "guerrillamail.com",
    "mailinator.com",
    "10minutemail.com",
    "throwaway.email",
    "temp-mail.org",
    "fakeinbox.com",
    "trashmail.com",
    "yopmail.com",
    "maildrop.cc",
    "getairmail.com",
    "mohmal.com",
    "tempail.com",
    "dispostable.com",
    "mailnesia.com",
    "tmail.com",
    "sharklasers.com",
    "grr.la",
    "guerrillamail.info",
    "spam4.me",
];

/// Trim surrounding whitespace and lowercase the whole address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check that a (normalized) address has a plausible mailbox shape.
pub fn valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// True when the address' domain is on the disposable-provider denylist.
///
/// An address with no `@` is not disposable; shape validation rejects it
/// separately.
pub fn is_disposable(email: &str) -> bool {
    match email.rsplit_once('@') {
        Some((_, domain)) => DISPOSABLE_DOMAINS.contains(&domain),
        None => false,
    }
}

/// Mask an address for display: first two characters of the local part,
/// then `***@domain`.
///
/// Short local parts keep whatever characters they have (`a@x.io` masks to
/// `a***@x.io`) and an address with no `@` is returned unchanged rather
/// than panicking; masking is cosmetic and must never abort a signup.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let visible: String = local.chars().take(2).collect();
            format!("{visible}***@{domain}")
        }
        None => email.to_string(),
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn normalize_trims_and_lowercases() {
        // ---
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
        assert_eq!(normalize_email("plain@host.io"), "plain@host.io");
    }

    #[test]
    fn validation_accepts_ordinary_addresses() {
        // ---
        assert!(valid_email("user@example.com"));
        assert!(valid_email("first.last+tag@sub.domain.co"));
    }

    #[test]
    fn validation_rejects_malformed_addresses() {
        // ---
        assert!(!valid_email(""));
        assert!(!valid_email("no-at-sign"));
        assert!(!valid_email("two@@example.com"));
        assert!(!valid_email("user@nodot"));
        assert!(!valid_email("spaces in@example.com"));
    }

    #[test]
    fn disposable_domains_match_exactly() {
        // ---
        assert!(is_disposable("anyone@mailinator.com"));
        assert!(is_disposable("x@grr.la"));
        // Subdomains and lookalikes are not on the list.
        assert!(!is_disposable("anyone@sub.mailinator.com"));
        assert!(!is_disposable("anyone@mailinator.org"));
        assert!(!is_disposable("no-at-sign"));
    }

    #[test]
    fn masking_keeps_two_chars_and_domain() {
        // ---
        assert_eq!(mask_email("johndoe@example.com"), "jo***@example.com");
    }

    #[test]
    fn masking_handles_short_local_parts() {
        // ---
        assert_eq!(mask_email("a@x.io"), "a***@x.io");
        assert_eq!(mask_email("ab@x.io"), "ab***@x.io");
        assert_eq!(mask_email("@x.io"), "***@x.io");
    }

    #[test]
    fn masking_never_panics_on_junk() {
        // ---
        assert_eq!(mask_email("no-at-sign"), "no-at-sign");
        assert_eq!(mask_email(""), "");
        // Multi-byte chars must not split on a byte boundary.
        assert_eq!(mask_email("émile@x.io"), "ém***@x.io");
    }
}
