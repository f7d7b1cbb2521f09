//! File System Utilities
//!
//! Configuration, data and log directory management.

use crate::constants::DATA_DIR_ENV;
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "goldwind", "rowscope").ok_or_else(|| Error::Invalid {
        message: "Could not determine project directories".to_string(),
    })
}

fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(dir.to_path_buf())
}

/// Get or create the application's configuration directory
///
/// Platform-specific locations:
/// - **Linux**: `~/.config/rowscope/` or `$XDG_CONFIG_HOME/rowscope/`
/// - **macOS**: `~/Library/Application Support/com.goldwind.rowscope/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\goldwind\rowscope\config\`
pub fn get_or_create_config_dir() -> Result<PathBuf> {
    ensure_dir(project_dirs()?.config_dir())
}

/// Get the data directory for storing larger files
///
/// Platform-specific locations:
/// - **Linux**: `~/.local/share/rowscope/`
/// - **macOS**: `~/Library/Application Support/com.goldwind.rowscope/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\goldwind\rowscope\data\`
pub fn get_or_create_data_dir() -> Result<PathBuf> {
    ensure_dir(project_dirs()?.data_dir())
}

/// Get or create the directory for rolling log files
pub fn get_or_create_log_dir() -> Result<PathBuf> {
    ensure_dir(&get_or_create_data_dir()?.join("logs"))
}

/// Resolve the flat-file dataset directory
///
/// Precedence: `ROWSCOPE_DATA_DIR`, then the configured directory, then
/// `<data dir>/datasets`.
pub fn resolve_dataset_dir(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    if let Some(dir) = configured {
        return Ok(dir.to_path_buf());
    }
    ensure_dir(&get_or_create_data_dir()?.join("datasets"))
}

/// Check if running in development mode
pub fn is_development() -> bool {
    cfg!(debug_assertions)
}
