use std::fmt;
use std::path::{Path, PathBuf};

use log::warn;

use crate::config::env_vars::{process_env, read_var};
use crate::constants::{
    ARCHIVE_DIR_NAME, DEFAULT_REMOTE_DIR, DEFAULT_SMTP_PORT, DEFAULT_SMTP_SERVER, ENV_EMAIL_PASSWORD,
    ENV_EMAIL_RECEIVER, ENV_EMAIL_SENDER, ENV_REMOTE_DIR, ENV_REMOTE_HOST, ENV_REMOTE_PASS, ENV_REMOTE_USER,
    ENV_SMTP_PORT, ENV_SMTP_SERVER, REDACTED, SFTP_DEFAULT_PORT,
};

/// Whether an optional stage may run, decided once when the configuration
/// is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageConfig<T> {
    Enabled(T),
    /// Names of the required variables that were unset or empty.
    Disabled { missing: Vec<&'static str> },
}

impl<T> StageConfig<T> {
    pub fn is_enabled(&self) -> bool {
        matches!(self, StageConfig::Enabled(_))
    }

    pub fn settings(&self) -> Option<&T> {
        match self {
            StageConfig::Enabled(settings) => Some(settings),
            StageConfig::Disabled { .. } => None,
        }
    }
}

/// SMTP relay and mailbox settings for the notifier.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub sender: String,
    pub password: String,
    pub receiver: String,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("sender", &self.sender)
            .field("password", &REDACTED)
            .field("receiver", &self.receiver)
            .finish()
    }
}

/// SFTP host and credentials for the uploader.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub remote_dir: String,
}

impl fmt::Debug for RemoteSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &REDACTED)
            .field("remote_dir", &self.remote_dir)
            .finish()
    }
}

/// Configuration for one run, built once at startup and handed to each stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory that receives archives and the audit log
    pub output_dir: PathBuf,
    pub email: StageConfig<SmtpSettings>,
    pub upload: StageConfig<RemoteSettings>,
}

impl AppConfig {
    /// Build the configuration from the process environment, writing
    /// archives under `<working_dir>/archives`.
    pub fn from_env(working_dir: &Path) -> Self {
        Self::from_lookup(working_dir, process_env)
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(working_dir: &Path, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            output_dir: working_dir.join(ARCHIVE_DIR_NAME),
            email: email_stage(&lookup),
            upload: upload_stage(&lookup),
        }
    }
}

fn email_stage<F>(lookup: &F) -> StageConfig<SmtpSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let sender = read_var(lookup, ENV_EMAIL_SENDER);
    let password = read_var(lookup, ENV_EMAIL_PASSWORD);
    let receiver = read_var(lookup, ENV_EMAIL_RECEIVER);

    match (sender, password, receiver) {
        (Some(sender), Some(password), Some(receiver)) => StageConfig::Enabled(SmtpSettings {
            host: read_var(lookup, ENV_SMTP_SERVER).unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string()),
            port: smtp_port(read_var(lookup, ENV_SMTP_PORT)),
            sender,
            password,
            receiver,
        }),
        (sender, password, receiver) => StageConfig::Disabled {
            missing: missing_names(&[
                (ENV_EMAIL_SENDER, sender.is_some()),
                (ENV_EMAIL_PASSWORD, password.is_some()),
                (ENV_EMAIL_RECEIVER, receiver.is_some()),
            ]),
        },
    }
}

fn upload_stage<F>(lookup: &F) -> StageConfig<RemoteSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let host = read_var(lookup, ENV_REMOTE_HOST);
    let username = read_var(lookup, ENV_REMOTE_USER);
    let password = read_var(lookup, ENV_REMOTE_PASS);

    match (host, username, password) {
        (Some(host), Some(username), Some(password)) => StageConfig::Enabled(RemoteSettings {
            host,
            port: SFTP_DEFAULT_PORT,
            username,
            password,
            remote_dir: read_var(lookup, ENV_REMOTE_DIR).unwrap_or_else(|| DEFAULT_REMOTE_DIR.to_string()),
        }),
        (host, username, password) => StageConfig::Disabled {
            missing: missing_names(&[
                (ENV_REMOTE_HOST, host.is_some()),
                (ENV_REMOTE_USER, username.is_some()),
                (ENV_REMOTE_PASS, password.is_some()),
            ]),
        },
    }
}

fn smtp_port(raw: Option<String>) -> u16 {
    match raw {
        None => DEFAULT_SMTP_PORT,
        Some(value) => match value.trim().parse::<u16>() {
            Ok(port) if port != 0 => port,
            _ => {
                warn!("Invalid {} value '{}', using {}", ENV_SMTP_PORT, value, DEFAULT_SMTP_PORT);
                DEFAULT_SMTP_PORT
            }
        },
    }
}

fn missing_names(checks: &[(&'static str, bool)]) -> Vec<&'static str> {
    checks
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect()
}
