//! Credential redaction for log lines and user-facing error text
//!
//! Provider transport errors can echo request URLs or headers back at us.
//! Anything that looks like a credential is replaced before it reaches a log
//! line, a debug artifact, or the terminal.

use once_cell::sync::Lazy;
use regex::Regex;

/// Pattern to match URLs with embedded credentials
static URL_WITH_CREDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(https?://)[^:@\s]+:[^@\s]+@").unwrap());

/// Bearer tokens in echoed Authorization headers
static BEARER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(bearer\s+)[A-Za-z0-9._~+/=-]+").unwrap());

/// Groq (`gsk_`) and Anthropic (`sk-ant-`) style keys
static PROVIDER_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(gsk_[A-Za-z0-9]{16,}|sk-ant-[A-Za-z0-9_-]{16,}|sk-[A-Za-z0-9_-]{20,})").unwrap());

/// Long opaque tokens (32+ key-safe characters)
static POTENTIAL_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|[^A-Za-z0-9_-])[A-Za-z0-9_-]{32,}([^A-Za-z0-9_-]|$)").unwrap()
});

/// Redact sensitive information from an error or log message.
///
/// Redaction rules:
/// - URLs with embedded credentials keep their scheme only
/// - Bearer tokens and known provider key shapes are replaced
/// - Any remaining 32+ character opaque token is replaced
#[must_use]
pub fn redact_secrets(message: &str) -> String {
    let redacted = URL_WITH_CREDS.replace_all(message, "$1[REDACTED]@");
    let redacted = BEARER_TOKEN.replace_all(&redacted, "$1[REDACTED]");
    let redacted = PROVIDER_KEY.replace_all(&redacted, "[REDACTED_KEY]");
    let redacted = POTENTIAL_KEY.replace_all(&redacted, "$1[REDACTED_KEY]$2");

    redacted.into_owned()
}
