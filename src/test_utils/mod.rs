//! Test utilities for the log archiver
//!
//! Shared fixtures for unit tests across modules.

#![cfg(test)]

use anyhow::Result;
use std::fs;
use tempfile::TempDir;

/// Creates a temporary directory that is automatically cleaned up
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a small log directory tree in a temporary directory
///
/// Layout: `app.log`, `error.log`, `rotated/app.log.1`
pub fn create_log_tree() -> Result<TempDir> {
    let temp_dir = create_temp_dir()?;
    let base_path = temp_dir.path();

    fs::create_dir_all(base_path.join("rotated"))?;

    fs::write(base_path.join("app.log"), b"2024-05-06T07:08:09Z INFO started\n")?;
    fs::write(base_path.join("error.log"), b"2024-05-06T07:08:10Z ERROR disk full\n")?;
    fs::write(base_path.join("rotated/app.log.1"), b"2024-05-05T23:59:59Z INFO stopped\n")?;

    Ok(temp_dir)
}
