//! Security utilities.
//!
//! Currently limited to credential scrubbing for messages that leave the
//! notifier and uploader stages.

pub mod credential_scrubber;

pub use credential_scrubber::{redact_secrets, safe_error_message, scrub_credentials};
