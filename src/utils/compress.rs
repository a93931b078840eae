use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, TimeZone};
use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, info, warn};
use tar::Builder;
use walkdir::WalkDir;

use crate::constants::{
    ARCHIVE_FILE_EXTENSION, ARCHIVE_FILE_PREFIX, ARCHIVE_TIMESTAMP_FORMAT, FALLBACK_ROOT_ENTRY,
};

/// Totals gathered while scanning a source tree before compression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceStats {
    pub files: u64,
    pub bytes: u64,
}

/// Build the archive file name for a run started at `timestamp`.
///
/// Names have second resolution, so two runs in the same second share a name.
///
/// # Example
///
/// ```
/// # use chrono::{Local, TimeZone};
/// # use log_archiver::utils::compress::archive_file_name;
/// let ts = Local.with_ymd_and_hms(2024, 1, 15, 14, 30, 52).unwrap();
/// assert_eq!(archive_file_name(&ts), "logs_archive_20240115_143052.tar.gz");
/// ```
pub fn archive_file_name<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}{}{}",
        ARCHIVE_FILE_PREFIX,
        timestamp.format(ARCHIVE_TIMESTAMP_FORMAT),
        ARCHIVE_FILE_EXTENSION
    )
}

/// Name of the top-level entry inside the archive for `source_dir`.
///
/// Uses the path's own base name, falling back to the canonical path's base
/// name for paths like `.` and to a fixed name for the filesystem root.
pub fn root_entry_name(source_dir: &Path) -> String {
    if let Some(name) = source_dir.file_name() {
        return name.to_string_lossy().into_owned();
    }

    fs::canonicalize(source_dir)
        .ok()
        .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| FALLBACK_ROOT_ENTRY.to_string())
}

/// Count regular files and their total size under `source_dir`.
///
/// Unreadable entries are logged and skipped here; the archiver reports them
/// as hard errors when it tries to read them.
pub fn scan_source(source_dir: &Path) -> SourceStats {
    let mut stats = SourceStats::default();

    for entry in WalkDir::new(source_dir).follow_links(false) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => {
                stats.files += 1;
                stats.bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
            }
            Ok(_) => {}
            Err(e) => warn!("Unable to scan {}: {}", source_dir.display(), e),
        }
    }

    stats
}

/// Write `source_dir` recursively into a gzip-compressed tar at `archive_path`.
///
/// The tree is stored under a single root entry named after the source
/// directory. Symlinks are stored as links rather than followed. An existing
/// file at `archive_path` is overwritten. When `archive_path` lies inside
/// `source_dir`, the archive being written is left out of itself.
pub fn create_tar_gz(source_dir: &Path, archive_path: &Path) -> io::Result<PathBuf> {
    let start = Instant::now();
    let root = PathBuf::from(root_entry_name(source_dir));

    debug!("Writing {} as '{}' into {}", source_dir.display(), root.display(), archive_path.display());

    let file = fs::File::create(archive_path)?;
    let own_archive = fs::canonicalize(archive_path)?;
    let walk_root = fs::canonicalize(source_dir)?;

    let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    let mut builder = Builder::new(encoder);
    builder.follow_symlinks(false);

    let walker = WalkDir::new(&walk_root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.path() != own_archive.as_path());

    for entry in walker {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(&walk_root)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        builder.append_path_with_name(entry.path(), root.join(relative))?;
    }

    let encoder = builder.into_inner()?;
    let mut writer = encoder.finish()?;
    writer.flush()?;

    info!("Compressed {} to {} in {:?}", source_dir.display(), archive_path.display(), start.elapsed());
    Ok(archive_path.to_path_buf())
}
