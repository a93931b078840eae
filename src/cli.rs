use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the log archiver.
///
/// Credentials for the optional email and upload stages come from the
/// environment (or a `.env` file), never from the command line.
#[derive(Parser, Debug)]
#[clap(
    name = "log-archiver",
    version,
    about = "Archive a log directory, notify by email and replicate over SFTP"
)]
pub struct Args {
    /// Directory of log files to archive
    #[clap(value_name = "LOG_DIR")]
    pub log_dir: PathBuf,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,
}
