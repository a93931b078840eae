//! Error types for the three workflow stages.
//!
//! Only [`ArchiveError`] is fatal to a run. [`NotificationError`] and
//! [`UploadError`] are caught by their stage and turned into a
//! [`StageOutcome::Failed`](crate::models::StageOutcome) reason.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the archive stage.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The source path does not exist or is not a directory. Raised before
    /// any file is written.
    #[error("'{}' is not a valid directory", path.display())]
    InvalidInput { path: PathBuf },

    /// I/O or permission failure while compressing or appending to the audit log.
    #[error("failed to {action} {}: {source}", path.display())]
    Creation {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ArchiveError {
    pub(crate) fn creation(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        ArchiveError::Creation {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Failures while composing or delivering the notification email.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("invalid email address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("failed to build email message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP delivery via {host}:{port} failed: {source}")]
    Smtp {
        host: String,
        port: u16,
        #[source]
        source: lettre::transport::smtp::Error,
    },
}

/// Failures while replicating the archive to the remote host.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("SSH {stage} failed: {source}")]
    Session {
        stage: &'static str,
        #[source]
        source: ssh2::Error,
    },

    #[error("SFTP session already closed")]
    SessionClosed,

    #[error("authentication failed for user '{username}'")]
    Authentication { username: String },

    #[error("remote path {path} exists but is not a directory")]
    NotADirectory { path: String },

    #[error("failed to create remote directory {path}: {reason}")]
    CreateDirectory { path: String, reason: String },

    #[error("failed to transfer {} to {remote}: {reason}", local.display())]
    Transfer {
        local: PathBuf,
        remote: String,
        reason: String,
    },

    #[error("invalid local file path: {}", path.display())]
    InvalidLocalPath { path: PathBuf },
}
