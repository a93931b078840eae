use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::error::ArchiveError;

/// Result of one successful archive stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
    /// Absolute path of the created `.tar.gz`
    pub archive_path: PathBuf,
    /// Path of the audit log the run was recorded in
    pub audit_log_path: PathBuf,
    pub timestamp: DateTime<Local>,
    /// Regular files found under the source directory
    pub file_count: u64,
    /// Total size of those files before compression
    pub source_bytes: u64,
    /// Size of the archive on disk
    pub archive_bytes: u64,
}

/// Subject/body pair sent by the notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

/// What happened to an optional stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage ran; the string describes where the result went.
    Completed(String),
    /// The stage was disabled by missing credentials.
    Skipped(String),
    /// The stage ran and failed; the reason has secrets scrubbed.
    Failed(String),
}

impl StageOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, StageOutcome::Completed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, StageOutcome::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StageOutcome::Failed(_))
    }
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageOutcome::Completed(detail) => write!(f, "completed: {}", detail),
            StageOutcome::Skipped(reason) => write!(f, "skipped: {}", reason),
            StageOutcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Terminal state of one run.
///
/// `Archived` is reached through `Archiving -> Notifying(success) -> Uploading`,
/// `Failed` through `Archiving -> Notifying(failure)`; upload never runs on
/// the failure path.
#[derive(Debug)]
pub enum RunReport {
    Archived {
        archive: ArchiveReport,
        notification: StageOutcome,
        upload: StageOutcome,
    },
    Failed {
        error: ArchiveError,
        notification: StageOutcome,
    },
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        matches!(self, RunReport::Archived { .. })
    }

    pub fn notification(&self) -> &StageOutcome {
        match self {
            RunReport::Archived { notification, .. } | RunReport::Failed { notification, .. } => notification,
        }
    }
}
