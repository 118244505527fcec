//! Input validation and sanitization.
//!
//! Pure functions, no I/O. Every externally supplied string passes through
//! `sanitize` before storage; the validators return the sanitized value so
//! callers never store the raw input by accident.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::limits::{
    MAX_EMAIL_LEN, MAX_PAYLOAD_KB, MAX_REFERRER_LEN, MAX_USER_AGENT_LEN, MIN_EMAIL_LEN,
};
use crate::types::Variant;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email regex is valid")
});

/// Trim and escape HTML-significant characters to named entities.
pub fn sanitize(input: &str) -> String {
    let trimmed = input.trim();
    let mut out = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '&' => out.push_str("&amp;"),
            other => out.push(other),
        }
    }
    out
}

fn truncate_chars(s: String, max: usize) -> String {
    if s.chars().count() <= max {
        s
    } else {
        s.chars().take(max).collect()
    }
}

/// Validate an email address, returning the sanitized value on success.
///
/// Rejects with a specific reason per failure: empty, out of bounds,
/// failing the shape pattern, or matching one of the suspicious patterns
/// (consecutive dots, leading/trailing dot, `@` adjacent to a dot or at the
/// end, embedded whitespace).
pub fn validate_email(email: &str) -> Result<String> {
    if email.is_empty() {
        return Err(Error::validation("Email is required"));
    }

    let sanitized = sanitize(email);

    if sanitized.len() > MAX_EMAIL_LEN {
        return Err(Error::validation("Email address is too long"));
    }
    if sanitized.len() < MIN_EMAIL_LEN {
        return Err(Error::validation("Email address is too short"));
    }
    if !EMAIL_RE.is_match(&sanitized) {
        return Err(Error::validation("Please enter a valid email address"));
    }

    let suspicious = sanitized.contains("..")
        || sanitized.starts_with('.')
        || sanitized.ends_with('.')
        || sanitized.contains("@.")
        || sanitized.ends_with('@')
        || sanitized.chars().any(char::is_whitespace);
    if suspicious {
        return Err(Error::validation("Email format is invalid"));
    }

    Ok(sanitized)
}

/// Validate a variant string: sanitized value must be exactly "A" or "B".
pub fn validate_variant(raw: &str) -> Result<Variant> {
    sanitize(raw).parse()
}

/// Sanitize a user agent. Never rejects; truncates to the field cap.
pub fn sanitize_user_agent(raw: &str) -> String {
    truncate_chars(sanitize(raw), MAX_USER_AGENT_LEN)
}

/// Sanitize a referrer. Never rejects; truncates to the field cap.
pub fn sanitize_referrer(raw: &str) -> String {
    truncate_chars(sanitize(raw), MAX_REFERRER_LEN)
}

/// Check a raw payload against the size ceiling (default 5KB).
pub fn validate_payload_size(payload: &[u8], max_kb: usize) -> Result<()> {
    if payload.len() > max_kb * 1024 {
        return Err(Error::PayloadTooLarge { max_kb });
    }
    Ok(())
}

/// Ceiling used by the ingestion endpoints.
pub fn validate_ingestion_payload(payload: &[u8]) -> Result<()> {
    validate_payload_size(payload, MAX_PAYLOAD_KB)
}
