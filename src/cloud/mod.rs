//! Remote replication of archives.
//!
//! The uploader copies a finished archive to a directory on a remote host
//! over SFTP, creating that directory when it is missing. The stage is
//! enabled only when host, user and password are all configured; any
//! failure is reported as a warning and returned as
//! [`StageOutcome::Failed`] without affecting the run.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐  connect   ┌─────────────────┐
//! │    Uploader     │───────────▶│ RemoteConnector │
//! └────────┬────────┘            └────────┬────────┘
//!          │                              │ RemoteSession
//!          │  directory_exists / mkdir    ▼
//!          └────── put / close ───▶ SFTP server
//! ```
//!
//! ## Usage Example
//!
//! ```no_run
//! use log_archiver::cloud::Uploader;
//! use log_archiver::config::AppConfig;
//! use std::path::Path;
//!
//! let config = AppConfig::from_env(Path::new("/srv/work"));
//! let uploader = Uploader::from_config(&config);
//! let outcome = uploader.upload(Path::new("/srv/work/archives/logs_archive_20240101_000000.tar.gz"));
//! println!("upload {}", outcome);
//! ```

use std::path::Path;

use log::{debug, info, warn};

use crate::config::{AppConfig, RemoteSettings, StageConfig};
use crate::error::UploadError;
use crate::models::StageOutcome;
use crate::security::safe_error_message;

/// SFTP transport built on libssh2
pub mod sftp;

pub use sftp::Ssh2Connector;

/// File operations the uploader needs from an open remote session.
pub trait RemoteSession {
    /// Whether `path` exists as a directory. A missing path is `Ok(false)`.
    fn directory_exists(&mut self, path: &str) -> Result<bool, UploadError>;

    /// Create a single directory level.
    fn create_directory(&mut self, path: &str) -> Result<(), UploadError>;

    /// Copy `local` to `remote`, returning the number of bytes written.
    fn put(&mut self, local: &Path, remote: &str) -> Result<u64, UploadError>;

    /// Close the file-transfer channel and the underlying transport.
    fn close(&mut self) -> Result<(), UploadError>;
}

/// Opens authenticated remote sessions.
pub trait RemoteConnector {
    type Session: RemoteSession;

    fn connect(&self, settings: &RemoteSettings) -> Result<Self::Session, UploadError>;
}

/// Join a remote directory and a file name with a single `/`.
pub fn remote_file_path(remote_dir: &str, file_name: &str) -> String {
    format!("{}/{}", remote_dir.trim_end_matches('/'), file_name)
}

/// Replicates archives to the configured remote directory.
pub struct Uploader<C = Ssh2Connector> {
    config: StageConfig<RemoteSettings>,
    connector: C,
}

impl Uploader<Ssh2Connector> {
    pub fn new(config: StageConfig<RemoteSettings>) -> Self {
        Self::with_connector(config, Ssh2Connector::default())
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.upload.clone())
    }
}

impl<C: RemoteConnector> Uploader<C> {
    pub fn with_connector(config: StageConfig<RemoteSettings>, connector: C) -> Self {
        Self { config, connector }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    /// Upload `local_path` under its base name. No connection is attempted
    /// when the stage is disabled.
    pub fn upload(&self, local_path: &Path) -> StageOutcome {
        let settings = match &self.config {
            StageConfig::Enabled(settings) => settings,
            StageConfig::Disabled { missing } => {
                let reason = format!("remote upload credentials not set ({})", missing.join(", "));
                warn!("Remote upload credentials not set ({}). Skipping upload.", missing.join(", "));
                return StageOutcome::Skipped(reason);
            }
        };

        match self.try_upload(settings, local_path) {
            Ok(remote_path) => {
                let destination = format!("{}:{}", settings.host, remote_path);
                info!("Archive uploaded successfully to {}", destination);
                StageOutcome::Completed(destination)
            }
            Err(e) => {
                let reason = safe_error_message("failed to upload to remote server", &e, &[settings.password.as_str()]);
                warn!("Failed to upload {}: {}", local_path.display(), reason);
                StageOutcome::Failed(reason)
            }
        }
    }

    fn try_upload(&self, settings: &RemoteSettings, local_path: &Path) -> Result<String, UploadError> {
        let file_name = local_path
            .file_name()
            .ok_or_else(|| UploadError::InvalidLocalPath {
                path: local_path.to_path_buf(),
            })?
            .to_string_lossy()
            .into_owned();

        debug!(
            "Connecting to sftp://{}@{}:{}",
            settings.username, settings.host, settings.port
        );
        let mut session = self.connector.connect(settings)?;

        let result = transfer(&mut session, &settings.remote_dir, local_path, &file_name);
        let closed = session.close();

        let remote_path = result?;
        if let Err(e) = closed {
            debug!("Ignoring error while closing SFTP session: {}", e);
        }
        Ok(remote_path)
    }
}

/// Ensure `remote_dir` exists on `session`, then copy `local_path` into it.
pub fn transfer<S: RemoteSession>(
    session: &mut S,
    remote_dir: &str,
    local_path: &Path,
    file_name: &str,
) -> Result<String, UploadError> {
    if !session.directory_exists(remote_dir)? {
        info!("Remote directory {} not found, creating it", remote_dir);
        session.create_directory(remote_dir)?;
    }

    let remote_path = remote_file_path(remote_dir, file_name);
    let bytes = session.put(local_path, &remote_path)?;
    debug!("Transferred {} bytes to {}", bytes, remote_path);

    Ok(remote_path)
}
