//! Notification stage: email the operator about the outcome of a run.
//!
//! The stage is enabled only when sender, password and receiver are all
//! configured. Delivery failures are reported as a warning and returned as
//! [`StageOutcome::Failed`]; they never abort the run.

use std::fmt;

use log::{info, warn};

use crate::config::{AppConfig, SmtpSettings, StageConfig};
use crate::constants::{FAILURE_SUBJECT, SUCCESS_SUBJECT};
use crate::error::NotificationError;
use crate::models::{ArchiveReport, Notification, StageOutcome};
use crate::security::safe_error_message;

/// SMTP delivery via lettre
pub mod smtp;

pub use smtp::SmtpMailer;

/// Sends one composed notification using the given SMTP settings.
#[cfg_attr(test, mockall::automock)]
pub trait Mailer {
    fn send(&self, settings: &SmtpSettings, notification: &Notification) -> Result<(), NotificationError>;
}

/// Email notifier for run outcomes.
pub struct Notifier<M = SmtpMailer> {
    config: StageConfig<SmtpSettings>,
    mailer: M,
}

impl Notifier<SmtpMailer> {
    pub fn new(config: StageConfig<SmtpSettings>) -> Self {
        Self::with_mailer(config, SmtpMailer)
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.email.clone())
    }
}

impl<M: Mailer> Notifier<M> {
    pub fn with_mailer(config: StageConfig<SmtpSettings>, mailer: M) -> Self {
        Self { config, mailer }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    /// Send `notification` once. No connection is attempted when the stage
    /// is disabled.
    pub fn notify(&self, notification: &Notification) -> StageOutcome {
        let settings = match &self.config {
            StageConfig::Enabled(settings) => settings,
            StageConfig::Disabled { missing } => {
                let reason = format!("email credentials not set ({})", missing.join(", "));
                warn!("{}. Skipping email notification.", capitalize(&reason));
                return StageOutcome::Skipped(reason);
            }
        };

        match self.mailer.send(settings, notification) {
            Ok(()) => {
                info!("Email notification sent to {}", settings.receiver);
                StageOutcome::Completed(settings.receiver.clone())
            }
            Err(e) => {
                let reason = safe_error_message("failed to send email", &e, &[settings.password.as_str()]);
                warn!("{}", capitalize(&reason));
                StageOutcome::Failed(reason)
            }
        }
    }
}

/// Message for a run whose archive was created.
pub fn success_notification(report: &ArchiveReport) -> Notification {
    Notification {
        subject: SUCCESS_SUBJECT.to_string(),
        body: format!(
            "Log archive completed successfully.\n\nArchive: {}\nLog File: {}\nHost: {}",
            report.archive_path.display(),
            report.audit_log_path.display(),
            local_hostname()
        ),
    }
}

/// Message for a run whose archive stage failed.
pub fn failure_notification(error: &impl fmt::Display) -> Notification {
    Notification {
        subject: FAILURE_SUBJECT.to_string(),
        body: format!("Log archive failed: {}", error),
    }
}

fn local_hostname() -> String {
    hostname::get()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
