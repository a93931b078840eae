//! # log-archiver
//!
//! Compress a directory of log files into a timestamped archive, keep an
//! append-only audit trail of archive runs, and optionally notify an
//! operator by email and replicate the archive to a remote host over SFTP.
//!
//! ## Overview
//!
//! A run is one linear pass through three stages:
//!
//! 1. **Archiver**: `./archives/logs_archive_<YYYYMMDD_HHMMSS>.tar.gz` plus
//!    one line appended to `./archives/archive_log.txt`
//! 2. **Notifier**: plain-text email over SMTP with STARTTLS
//! 3. **Uploader**: SFTP copy into the configured remote directory
//!
//! The notifier and uploader are enabled only when their credentials are
//! present in the environment. Only an archive failure fails the run; it
//! triggers the failure email and skips the upload.
//!
//! ## Usage
//!
//! ```no_run
//! use log_archiver::config::AppConfig;
//! use log_archiver::workflow::Workflow;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = AppConfig::from_env(&std::env::current_dir()?);
//! let report = Workflow::from_config(&config).run(Path::new("/var/log/app"));
//!
//! println!("archived: {}", report.is_success());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`config`]: Environment-driven run configuration
//! - [`archiver`]: Archive stage
//! - [`notifier`]: Email notification stage
//! - [`cloud`]: SFTP upload stage
//! - [`workflow`]: Stage sequencing for one run
//! - [`utils`]: Tarball creation and the audit log
//! - [`security`]: Credential scrubbing for reported errors
//! - [`models`]: Reports and stage outcomes
//! - [`error`]: Stage error types
//! - [`constants`]: Application-wide constants

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Core data models: reports, notifications and stage outcomes
pub mod models;

/// Error types for each stage
pub mod error;

/// Archive stage
pub mod archiver;

/// Email notification stage
pub mod notifier;

/// Remote upload stage (SFTP)
pub mod cloud;

/// Stage sequencing for a single run
pub mod workflow;

/// Utility functions for compression and the audit log
pub mod utils;

/// Configuration built from the environment
pub mod config;

/// Application constants and default values
pub mod constants;

/// Security utilities for credential protection
pub mod security;

/// Test utilities and helpers
#[cfg(test)]
pub mod test_utils;
