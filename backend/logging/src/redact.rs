//! Log Redaction Layer
//!
//! Scrubs provider API keys and bearer tokens from strings prior to
//! logging. The gateway handles user financial data; leaked credentials in
//! a log file would expose every upstream account.

use once_cell::sync::Lazy;
use regex::Regex;

static API_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(key=[a-zA-Z0-9\-_]{16,})|(apikey:?\s*[a-zA-Z0-9]{8,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)")
        .unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive(input: &str) -> String {
    API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]").to_string()
}
