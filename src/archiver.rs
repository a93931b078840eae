//! Archive stage: compress a log directory into a timestamped tarball and
//! record the run in the audit log.
//!
//! Archive creation and the audit-log append are not transactional. A crash
//! between the two leaves an archive without an audit entry.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::{debug, info};

use crate::config::AppConfig;
use crate::constants::AUDIT_LOG_FILE_NAME;
use crate::error::ArchiveError;
use crate::models::ArchiveReport;
use crate::utils::audit_log::{AuditEntry, AuditLog};
use crate::utils::compress::{archive_file_name, create_tar_gz, scan_source};

/// Creates archives and audit entries under a single output directory.
#[derive(Debug, Clone)]
pub struct Archiver {
    output_dir: PathBuf,
}

impl Archiver {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.output_dir.clone())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn audit_log_path(&self) -> PathBuf {
        self.output_dir.join(AUDIT_LOG_FILE_NAME)
    }

    /// Archive `source_dir` using the current local time as the run timestamp.
    pub fn archive(&self, source_dir: &Path) -> Result<ArchiveReport, ArchiveError> {
        self.archive_at(source_dir, Local::now())
    }

    /// Archive `source_dir` as a run started at `timestamp`.
    ///
    /// Fails with [`ArchiveError::InvalidInput`] before touching the
    /// filesystem if `source_dir` is not an existing directory. Any I/O error
    /// afterwards is an [`ArchiveError::Creation`].
    pub fn archive_at(&self, source_dir: &Path, timestamp: DateTime<Local>) -> Result<ArchiveReport, ArchiveError> {
        validate_source(source_dir)?;

        fs::create_dir_all(&self.output_dir)
            .map_err(|e| ArchiveError::creation("create output directory", &self.output_dir, e))?;
        let output_dir = fs::canonicalize(&self.output_dir)
            .map_err(|e| ArchiveError::creation("resolve output directory", &self.output_dir, e))?;

        let archive_path = output_dir.join(archive_file_name(&timestamp));
        let stats = scan_source(source_dir);

        info!(
            "Archiving {} ({} files, {} bytes) to {}",
            source_dir.display(),
            stats.files,
            stats.bytes,
            archive_path.display()
        );

        create_tar_gz(source_dir, &archive_path)
            .map_err(|e| ArchiveError::creation("write archive", &archive_path, e))?;

        let archive_bytes = fs::metadata(&archive_path)
            .map_err(|e| ArchiveError::creation("stat archive", &archive_path, e))?
            .len();

        let audit_log = AuditLog::new(output_dir.join(AUDIT_LOG_FILE_NAME));
        let entry = AuditEntry {
            timestamp,
            source: source_dir.to_path_buf(),
            archive: archive_path.clone(),
        };
        audit_log
            .append(&entry)
            .map_err(|e| ArchiveError::creation("append to audit log", audit_log.path(), e))?;

        debug!("Recorded run in {}", audit_log.path().display());

        Ok(ArchiveReport {
            archive_path,
            audit_log_path: audit_log.path().to_path_buf(),
            timestamp,
            file_count: stats.files,
            source_bytes: stats.bytes,
            archive_bytes,
        })
    }
}

fn validate_source(source_dir: &Path) -> Result<(), ArchiveError> {
    if source_dir.is_dir() {
        Ok(())
    } else {
        Err(ArchiveError::InvalidInput {
            path: source_dir.to_path_buf(),
        })
    }
}
