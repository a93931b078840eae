//! One archive run: archive, then notify, then upload.
//!
//! Only the archive stage can fail the run. A failed archive sends the
//! failure notification and skips the upload; notification and upload
//! problems are reported in the [`RunReport`] and never propagate.

use std::path::Path;

use log::{error, info};

use crate::archiver::Archiver;
use crate::cloud::{RemoteConnector, Ssh2Connector, Uploader};
use crate::config::AppConfig;
use crate::models::RunReport;
use crate::notifier::{failure_notification, success_notification, Mailer, Notifier, SmtpMailer};

/// The three stages wired together for a single run.
pub struct Workflow<M = SmtpMailer, C = Ssh2Connector> {
    archiver: Archiver,
    notifier: Notifier<M>,
    uploader: Uploader<C>,
}

impl Workflow<SmtpMailer, Ssh2Connector> {
    /// Workflow using the real SMTP and SFTP transports.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Archiver::from_config(config),
            Notifier::from_config(config),
            Uploader::from_config(config),
        )
    }
}

impl<M: Mailer, C: RemoteConnector> Workflow<M, C> {
    pub fn new(archiver: Archiver, notifier: Notifier<M>, uploader: Uploader<C>) -> Self {
        Self {
            archiver,
            notifier,
            uploader,
        }
    }

    /// Run every stage once for `source_dir`.
    pub fn run(&self, source_dir: &Path) -> RunReport {
        info!("Starting log archive of {}", source_dir.display());

        match self.archiver.archive(source_dir) {
            Ok(archive) => {
                info!(
                    "Archive created at {} ({} files, {} bytes compressed)",
                    archive.archive_path.display(),
                    archive.file_count,
                    archive.archive_bytes
                );

                let notification = self.notifier.notify(&success_notification(&archive));
                let upload = self.uploader.upload(&archive.archive_path);

                info!("Process completed successfully.");
                RunReport::Archived {
                    archive,
                    notification,
                    upload,
                }
            }
            Err(e) => {
                error!("Log archive failed: {}", e);
                let notification = self.notifier.notify(&failure_notification(&e));

                RunReport::Failed {
                    error: e,
                    notification,
                }
            }
        }
    }
}
