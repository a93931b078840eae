//! End-to-end tests for a single archive run.
//!
//! Email and SFTP transports are replaced with in-memory fakes so the
//! tests can assert on which stages ran without any network access.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Result;
use tempfile::TempDir;

use log_archiver::archiver::Archiver;
use log_archiver::cloud::{RemoteConnector, RemoteSession, Uploader};
use log_archiver::config::{AppConfig, RemoteSettings, SmtpSettings, StageConfig};
use log_archiver::constants::{FAILURE_SUBJECT, SUCCESS_SUBJECT};
use log_archiver::error::{ArchiveError, NotificationError, UploadError};
use log_archiver::models::{Notification, RunReport, StageOutcome};
use log_archiver::notifier::{Mailer, Notifier};
use log_archiver::workflow::Workflow;

/// Records every message instead of sending it
#[derive(Clone, Default)]
struct RecordingMailer {
    sent: Rc<RefCell<Vec<Notification>>>,
}

impl Mailer for RecordingMailer {
    fn send(&self, _settings: &SmtpSettings, notification: &Notification) -> Result<(), NotificationError> {
        self.sent.borrow_mut().push(notification.clone());
        Ok(())
    }
}

/// In-memory remote filesystem shared by every session it hands out
#[derive(Clone, Default)]
struct MemoryRemote {
    connects: Rc<RefCell<usize>>,
    dirs: Rc<RefCell<Vec<String>>>,
    created_dirs: Rc<RefCell<Vec<String>>>,
    files: Rc<RefCell<HashMap<String, Vec<u8>>>>,
}

impl RemoteSession for MemoryRemote {
    fn directory_exists(&mut self, path: &str) -> Result<bool, UploadError> {
        Ok(self.dirs.borrow().iter().any(|d| d == path))
    }

    fn create_directory(&mut self, path: &str) -> Result<(), UploadError> {
        self.dirs.borrow_mut().push(path.to_string());
        self.created_dirs.borrow_mut().push(path.to_string());
        Ok(())
    }

    fn put(&mut self, local: &Path, remote: &str) -> Result<u64, UploadError> {
        let data = fs::read(local).map_err(|e| UploadError::Transfer {
            local: local.to_path_buf(),
            remote: remote.to_string(),
            reason: e.to_string(),
        })?;
        let len = data.len() as u64;
        self.files.borrow_mut().insert(remote.to_string(), data);
        Ok(len)
    }

    fn close(&mut self) -> Result<(), UploadError> {
        Ok(())
    }
}

impl RemoteConnector for MemoryRemote {
    type Session = MemoryRemote;

    fn connect(&self, _settings: &RemoteSettings) -> Result<MemoryRemote, UploadError> {
        *self.connects.borrow_mut() += 1;
        Ok(self.clone())
    }
}

fn smtp_settings() -> SmtpSettings {
    SmtpSettings {
        host: "smtp.example.com".to_string(),
        port: 587,
        sender: "ops@example.com".to_string(),
        password: "hunter2".to_string(),
        receiver: "oncall@example.com".to_string(),
    }
}

fn remote_settings() -> RemoteSettings {
    RemoteSettings {
        host: "backup.example.com".to_string(),
        port: 22,
        username: "archiver".to_string(),
        password: "s3cret".to_string(),
        remote_dir: "/backups/logs".to_string(),
    }
}

fn log_dir(work: &TempDir) -> Result<PathBuf> {
    let dir = work.path().join("app");
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("app.log"), "first\n")?;
    fs::write(dir.join("worker.log"), "second\n")?;
    Ok(dir)
}

fn workflow(
    work: &TempDir,
    email: StageConfig<SmtpSettings>,
    upload: StageConfig<RemoteSettings>,
    mailer: RecordingMailer,
    remote: MemoryRemote,
) -> Workflow<RecordingMailer, MemoryRemote> {
    Workflow::new(
        Archiver::new(work.path().join("archives")),
        Notifier::with_mailer(email, mailer),
        Uploader::with_connector(upload, remote),
    )
}

/// No credentials configured: archive and audit line, both optional stages skipped
#[test]
fn test_run_without_credentials() -> Result<()> {
    let work = TempDir::new()?;
    let source = log_dir(&work)?;
    let config = AppConfig::from_lookup(work.path(), |_| None);
    let mailer = RecordingMailer::default();
    let remote = MemoryRemote::default();

    let report = workflow(&work, config.email, config.upload, mailer.clone(), remote.clone()).run(&source);

    match report {
        RunReport::Archived {
            archive,
            notification,
            upload,
        } => {
            assert!(archive.archive_path.exists());
            assert_eq!(archive.file_count, 2);
            assert!(notification.is_skipped());
            assert!(upload.is_skipped());
        }
        RunReport::Failed { error, .. } => panic!("run failed: {}", error),
    }

    let log = fs::read_to_string(work.path().join("archives/archive_log.txt"))?;
    assert_eq!(log.lines().count(), 1);
    assert!(mailer.sent.borrow().is_empty());
    assert_eq!(*remote.connects.borrow(), 0);
    Ok(())
}

/// A missing source directory takes the failure path and never uploads
#[test]
fn test_run_with_missing_directory() -> Result<()> {
    let work = TempDir::new()?;
    let mailer = RecordingMailer::default();
    let remote = MemoryRemote::default();
    let wf = workflow(
        &work,
        StageConfig::Enabled(smtp_settings()),
        StageConfig::Enabled(remote_settings()),
        mailer.clone(),
        remote.clone(),
    );

    let report = wf.run(&work.path().join("missing"));

    match &report {
        RunReport::Failed { error, notification } => {
            assert!(matches!(error, ArchiveError::InvalidInput { .. }));
            assert!(notification.is_completed());
        }
        RunReport::Archived { .. } => panic!("run should have failed"),
    }
    assert!(!report.is_success());

    let sent = mailer.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, FAILURE_SUBJECT);
    assert!(sent[0].body.starts_with("Log archive failed: "));
    assert_eq!(*remote.connects.borrow(), 0);
    assert!(!work.path().join("archives").exists());
    Ok(())
}

/// A missing source directory without email credentials skips the failure email
#[test]
fn test_failure_notification_skipped_without_credentials() -> Result<()> {
    let work = TempDir::new()?;
    let config = AppConfig::from_lookup(work.path(), |_| None);
    let mailer = RecordingMailer::default();
    let wf = workflow(&work, config.email, config.upload, mailer.clone(), MemoryRemote::default());

    let report = wf.run(&work.path().join("missing"));

    assert!(!report.is_success());
    assert!(report.notification().is_skipped());
    assert!(mailer.sent.borrow().is_empty());
    Ok(())
}

/// Full success path: one success email, archive copied into a freshly created remote dir
#[test]
fn test_run_with_all_stages_enabled() -> Result<()> {
    let work = TempDir::new()?;
    let source = log_dir(&work)?;
    let mailer = RecordingMailer::default();
    let remote = MemoryRemote::default();
    let wf = workflow(
        &work,
        StageConfig::Enabled(smtp_settings()),
        StageConfig::Enabled(remote_settings()),
        mailer.clone(),
        remote.clone(),
    );

    let report = wf.run(&source);

    let archive = match report {
        RunReport::Archived {
            archive,
            notification,
            upload,
        } => {
            assert_eq!(notification, StageOutcome::Completed("oncall@example.com".to_string()));
            assert!(upload.is_completed());
            archive
        }
        RunReport::Failed { error, .. } => panic!("run failed: {}", error),
    };

    let sent = mailer.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, SUCCESS_SUBJECT);
    assert!(sent[0].body.contains(&archive.archive_path.display().to_string()));
    assert!(sent[0].body.contains(&archive.audit_log_path.display().to_string()));

    assert_eq!(*remote.created_dirs.borrow(), vec!["/backups/logs".to_string()]);
    let file_name = archive.archive_path.file_name().unwrap().to_string_lossy().into_owned();
    let files = remote.files.borrow();
    let uploaded = files.get(&format!("/backups/logs/{}", file_name)).expect("archive uploaded");
    assert_eq!(uploaded, &fs::read(&archive.archive_path)?);
    Ok(())
}

/// An existing remote directory is reused without a create call
#[test]
fn test_existing_remote_directory_is_reused() -> Result<()> {
    let work = TempDir::new()?;
    let source = log_dir(&work)?;
    let remote = MemoryRemote::default();
    remote.dirs.borrow_mut().push("/backups/logs".to_string());
    let wf = workflow(
        &work,
        StageConfig::Disabled {
            missing: vec!["EMAIL_SENDER"],
        },
        StageConfig::Enabled(remote_settings()),
        RecordingMailer::default(),
        remote.clone(),
    );

    let report = wf.run(&source);

    assert!(report.is_success());
    assert!(remote.created_dirs.borrow().is_empty());
    assert_eq!(remote.files.borrow().len(), 1);
    Ok(())
}
