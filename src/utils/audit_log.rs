use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::constants::AUDIT_TIMESTAMP_FORMAT;

/// One line of the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub timestamp: DateTime<Local>,
    pub source: PathBuf,
    pub archive: PathBuf,
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] Archived {} -> {}",
            self.timestamp.format(AUDIT_TIMESTAMP_FORMAT),
            self.source.display(),
            self.archive.display()
        )
    }
}

/// Append-only, line-oriented record of archive runs.
///
/// There is no locking: concurrent runs against the same log may interleave.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `entry` as a single line, creating the file if needed.
    pub fn append(&self, entry: &AuditEntry) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        // One write per line keeps each entry contiguous under O_APPEND
        file.write_all(format!("{}\n", entry).as_bytes())?;
        file.flush()
    }
}
