use std::env;
use std::path::PathBuf;

use log::debug;

/// Read a variable through `lookup`, treating an empty or whitespace-only
/// value the same as an unset one.
pub fn read_var<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|value| !value.trim().is_empty())
}

/// Lookup function backed by the process environment.
pub fn process_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// Load a `.env` file from the working directory (or a parent) into the
/// process environment. Variables already set are left untouched and a
/// missing file is not an error.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!("Loaded environment overrides from {}", path.display());
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            debug!("Ignoring unreadable .env file: {}", e);
            None
        }
    }
}
