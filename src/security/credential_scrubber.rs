//! Credential scrubbing utilities for preventing sensitive data exposure.
//!
//! Transport errors from the SMTP and SSH libraries are surfaced to the
//! operator and stored in stage outcomes. Everything passes through here
//! first so configured passwords and credential-shaped text never reach the
//! console.

use lazy_static::lazy_static;
use regex::Regex;

use crate::constants::{REDACTED, SHORT_SECRET_LEN};

lazy_static! {
    /// Regex patterns for detecting credentials embedded in messages
    static ref CREDENTIAL_PATTERNS: Vec<(Regex, &'static str)> = vec![
        // Generic passwords
        (Regex::new(r"(?i)(password|passwd|pass|pwd)\s*[:=]\s*([^\s]+)").unwrap(),
         "$1=<REDACTED_PASSWORD>"),

        // Credentials embedded in smtp/ssh/sftp URLs
        (Regex::new(r"(?i)(smtps?|sftp|ssh)://([^:/@\s]+):([^@\s]+)@").unwrap(),
         "$1://<REDACTED_USER>:<REDACTED_PASS>@"),

        // SMTP AUTH PLAIN/LOGIN payloads echoed back in protocol errors
        (Regex::new(r"(?i)(AUTH\s+(PLAIN|LOGIN))\s+[A-Za-z0-9+/=]+").unwrap(),
         "$1 <REDACTED_AUTH>"),
    ];
}

/// Scrub credential-shaped substrings from a string.
///
/// # Example
///
/// ```
/// use log_archiver::security::credential_scrubber::scrub_credentials;
///
/// let input = "Failed to connect with password=secret123";
/// let scrubbed = scrub_credentials(input);
/// assert_eq!(scrubbed, "Failed to connect with password=<REDACTED_PASSWORD>");
/// ```
pub fn scrub_credentials(input: &str) -> String {
    let mut result = input.to_string();

    for (pattern, replacement) in CREDENTIAL_PATTERNS.iter() {
        result = pattern.replace_all(&result, *replacement).to_string();
    }

    result
}

/// Replace occurrences of the given secret values with a placeholder.
///
/// Empty secrets are ignored so they cannot blank out the whole message.
/// Secrets shorter than [`SHORT_SECRET_LEN`] are only replaced where they are
/// not part of a longer alphanumeric run, so a password like `a` does not
/// blank out every letter of the reason.
pub fn redact_secrets(input: &str, secrets: &[&str]) -> String {
    secrets
        .iter()
        .filter(|secret| !secret.is_empty())
        .fold(input.to_string(), |acc, secret| {
            if secret.len() >= SHORT_SECRET_LEN {
                acc.replace(secret, REDACTED)
            } else {
                redact_whole_tokens(&acc, secret)
            }
        })
}

fn redact_whole_tokens(input: &str, secret: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut copied = 0;

    for (start, _) in input.match_indices(secret) {
        let end = start + secret.len();
        let before = input[..start].chars().next_back();
        let after = input[end..].chars().next();
        if before.map_or(false, char::is_alphanumeric) || after.map_or(false, char::is_alphanumeric) {
            continue;
        }
        result.push_str(&input[copied..start]);
        result.push_str(REDACTED);
        copied = end;
    }

    result.push_str(&input[copied..]);
    result
}

/// Format `context: error` with both literal secrets and credential
/// patterns removed.
pub fn safe_error_message(context: &str, error: &impl std::fmt::Display, secrets: &[&str]) -> String {
    let raw_message = format!("{}: {}", context, error);
    scrub_credentials(&redact_secrets(&raw_message, secrets))
}
