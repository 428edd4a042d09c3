//! Data directory and database path resolution.

use std::env;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "ROLECHAT_DATA_DIR";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the system data directory.
    #[error("Cannot determine system data directory")]
    NoDataDir,

    /// Failed to create a directory.
    #[error("Failed to create directory {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },
}

/// Get the root directory for application data.
///
/// Resolution order:
/// 1. `ROLECHAT_DATA_DIR` environment variable
/// 2. System data directory (e.g., `~/.local/share/rolechat`)
pub fn data_root() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(path));
    }

    let data_dir = dirs::data_local_dir().ok_or(PathError::NoDataDir)?;
    Ok(data_dir.join("rolechat"))
}

/// Get the path to the rolechat database file.
///
/// The data directory is created if it doesn't exist.
pub fn database_path() -> Result<PathBuf, PathError> {
    let root = data_root()?;

    fs::create_dir_all(&root).map_err(|e| PathError::CreateFailed {
        path: root.clone(),
        reason: e.to_string(),
    })?;

    Ok(root.join("rolechat.db"))
}
