//! Utility functions for archive creation and bookkeeping.
//!
//! ## Components
//!
//! - **Compression**: gzip-compressed tar archives of a directory tree
//! - **Audit log**: append-only record of completed archive runs
//!
//! ## Common Use Cases
//!
//! ### Creating an Archive
//!
//! ```no_run
//! use chrono::Local;
//! use log_archiver::utils::compress::{archive_file_name, create_tar_gz};
//! use std::path::Path;
//!
//! # fn example() -> std::io::Result<()> {
//! let name = archive_file_name(&Local::now());
//! let archive = create_tar_gz(Path::new("/var/log/app"), &Path::new("/tmp").join(name))?;
//! println!("Created archive: {}", archive.display());
//! # Ok(())
//! # }
//! ```

/// Tar + gzip archive creation and archive naming
pub mod compress;

/// Append-only audit log of archive runs
pub mod audit_log;
