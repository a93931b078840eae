//! Global constants for the log archiver.
//!
//! This module centralizes all hardcoded values so the defaults used by the
//! archive, notification and upload stages live in one place.

// Archive layout
/// Directory, relative to the working directory, that receives archives
pub const ARCHIVE_DIR_NAME: &str = "archives";

/// Append-only audit log kept next to the archives
pub const AUDIT_LOG_FILE_NAME: &str = "archive_log.txt";

/// Prefix of every archive file name
pub const ARCHIVE_FILE_PREFIX: &str = "logs_archive_";

/// Extension of every archive file name
pub const ARCHIVE_FILE_EXTENSION: &str = ".tar.gz";

/// chrono format of the timestamp embedded in archive names (second resolution)
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// chrono format of the timestamp written to the audit log
pub const AUDIT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Root entry name used when the source path has no base name (e.g. `/`)
pub const FALLBACK_ROOT_ENTRY: &str = "logs";

// Email notification
/// Default SMTP relay
pub const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";

/// Default SMTP submission port (STARTTLS)
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Subject of the success notification
pub const SUCCESS_SUBJECT: &str = "✅ Log Archive Completed";

/// Subject of the failure notification
pub const FAILURE_SUBJECT: &str = "❌ Log Archive Failed";

// Remote upload
/// Secure shell port used for SFTP
pub const SFTP_DEFAULT_PORT: u16 = 22;

/// Default remote directory for uploaded archives
pub const DEFAULT_REMOTE_DIR: &str = "/backups/logs";

/// Permissions for a remote directory created by the uploader
pub const REMOTE_DIR_MODE: i32 = 0o755;

/// libssh2 SFTP status code for a missing file or directory
pub const SFTP_NO_SUCH_FILE: i32 = 2;

// Environment variables
pub const ENV_EMAIL_SENDER: &str = "EMAIL_SENDER";
pub const ENV_EMAIL_PASSWORD: &str = "EMAIL_PASSWORD";
pub const ENV_EMAIL_RECEIVER: &str = "EMAIL_RECEIVER";
pub const ENV_SMTP_SERVER: &str = "SMTP_SERVER";
pub const ENV_SMTP_PORT: &str = "SMTP_PORT";
pub const ENV_REMOTE_HOST: &str = "REMOTE_HOST";
pub const ENV_REMOTE_USER: &str = "REMOTE_USER";
pub const ENV_REMOTE_PASS: &str = "REMOTE_PASS";
pub const ENV_REMOTE_DIR: &str = "REMOTE_DIR";

// Logging
/// Placeholder substituted for secrets in log lines and outcome reasons
pub const REDACTED: &str = "<REDACTED>";
/// Secrets shorter than this are only redacted where they stand as a whole token
pub const SHORT_SECRET_LEN: usize = 8;
