//! Log Redaction Layer
//!
//! Scrubs Aadhaar numbers, phone numbers and access tokens from strings
//! before they reach a log sink.

use regex::Regex;
use std::sync::LazyLock;

static AADHAAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}[ -]?\d{4}[ -]?\d{4}\b").unwrap());
static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\+91[-\s]?)?\b[6-9]\d{4}[-\s]?\d{5}\b").unwrap());
static LANDLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3,5}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap()
});
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:sk-[a-zA-Z0-9]{32,}|Bearer\s+[a-zA-Z0-9\-._~+/]+=*)").unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    // Aadhaar first: its 4-4-4 groups would otherwise be eaten as phone numbers.
    let mut redacted = AADHAAR_RE.replace_all(input, "[REDACTED_AADHAAR]").to_string();

    redacted = MOBILE_RE.replace_all(&redacted, "[REDACTED_PHONE]").to_string();
    redacted = LANDLINE_RE.replace_all(&redacted, "[REDACTED_PHONE]").to_string();
    TOKEN_RE.replace_all(&redacted, "[REDACTED_TOKEN]").to_string()
}
