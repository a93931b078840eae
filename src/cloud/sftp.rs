use std::fs;
use std::io;
use std::net::TcpStream;
use std::path::Path;
use std::time::Instant;

use log::debug;
use ssh2::{ErrorCode, Session, Sftp};

use crate::cloud::{RemoteConnector, RemoteSession};
use crate::config::RemoteSettings;
use crate::constants::{REMOTE_DIR_MODE, SFTP_NO_SUCH_FILE};
use crate::error::UploadError;

/// Opens password-authenticated SFTP sessions with libssh2.
///
/// Network calls use the operating system's default socket timeouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ssh2Connector;

impl Ssh2Connector {
    /// Create a new SSH session
    fn create_session(&self, settings: &RemoteSettings) -> Result<Session, UploadError> {
        let tcp = TcpStream::connect((settings.host.as_str(), settings.port)).map_err(|source| UploadError::Connect {
            host: settings.host.clone(),
            port: settings.port,
            source,
        })?;

        let mut session = Session::new().map_err(|source| UploadError::Session {
            stage: "session setup",
            source,
        })?;
        session.set_tcp_stream(tcp);
        session.handshake().map_err(|source| UploadError::Session {
            stage: "handshake",
            source,
        })?;

        session
            .userauth_password(&settings.username, &settings.password)
            .map_err(|_| UploadError::Authentication {
                username: settings.username.clone(),
            })?;

        // Verify authentication
        if !session.authenticated() {
            return Err(UploadError::Authentication {
                username: settings.username.clone(),
            });
        }

        Ok(session)
    }
}

impl RemoteConnector for Ssh2Connector {
    type Session = Ssh2Session;

    fn connect(&self, settings: &RemoteSettings) -> Result<Ssh2Session, UploadError> {
        let session = self.create_session(settings)?;
        let sftp = session.sftp().map_err(|source| UploadError::Session {
            stage: "SFTP subsystem",
            source,
        })?;

        debug!("Opened SFTP session to {}:{}", settings.host, settings.port);
        Ok(Ssh2Session {
            session,
            sftp: Some(sftp),
        })
    }
}

/// An authenticated SSH transport with its SFTP channel.
pub struct Ssh2Session {
    session: Session,
    sftp: Option<Sftp>,
}

impl Ssh2Session {
    fn sftp(&self) -> Result<&Sftp, UploadError> {
        self.sftp.as_ref().ok_or(UploadError::SessionClosed)
    }
}

impl RemoteSession for Ssh2Session {
    fn directory_exists(&mut self, path: &str) -> Result<bool, UploadError> {
        match self.sftp()?.stat(Path::new(path)) {
            Ok(stat) if stat.is_dir() => Ok(true),
            Ok(_) => Err(UploadError::NotADirectory { path: path.to_string() }),
            Err(e) if e.code() == ErrorCode::SFTP(SFTP_NO_SUCH_FILE) => Ok(false),
            Err(source) => Err(UploadError::Session {
                stage: "remote stat",
                source,
            }),
        }
    }

    fn create_directory(&mut self, path: &str) -> Result<(), UploadError> {
        self.sftp()?
            .mkdir(Path::new(path), REMOTE_DIR_MODE)
            .map_err(|e| UploadError::CreateDirectory {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }

    fn put(&mut self, local: &Path, remote: &str) -> Result<u64, UploadError> {
        let transfer_error = |reason: String| UploadError::Transfer {
            local: local.to_path_buf(),
            remote: remote.to_string(),
            reason,
        };

        let start = Instant::now();
        let mut local_file = fs::File::open(local).map_err(|e| transfer_error(format!("failed to open local file: {}", e)))?;
        let mut remote_file = self
            .sftp()?
            .create(Path::new(remote))
            .map_err(|e| transfer_error(format!("failed to create remote file: {}", e)))?;

        let bytes = io::copy(&mut local_file, &mut remote_file)
            .map_err(|e| transfer_error(format!("failed to write remote file: {}", e)))?;

        debug!("Wrote {} bytes to {} in {:?}", bytes, remote, start.elapsed());
        Ok(bytes)
    }

    fn close(&mut self) -> Result<(), UploadError> {
        // SFTP channel first, then the transport
        drop(self.sftp.take());
        self.session
            .disconnect(None, "archive upload finished", None)
            .map_err(|source| UploadError::Session {
                stage: "disconnect",
                source,
            })
    }
}
