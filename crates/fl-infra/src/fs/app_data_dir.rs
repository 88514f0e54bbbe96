use anyhow::{Context, Result};
use std::path::PathBuf;

/// Get the FieldLink application data root directory.
///
/// # Platform-specific Paths
/// - macOS: ~/Library/Application Support/FieldLink
/// - Windows: %APPDATA%\FieldLink
/// - Linux: $XDG_DATA_HOME/fieldlink or ~/.local/share/fieldlink
///
/// This function does not create directories; the caller decides when.
pub fn app_data_dir() -> Result<PathBuf> {
    let base_dir =
        platform_data_dir().context("Failed to get platform-specific data directory")?;

    if cfg!(target_os = "linux") {
        Ok(base_dir.join("fieldlink"))
    } else {
        Ok(base_dir.join("FieldLink"))
    }
}

/// Directory holding the upload queue database
pub fn db_dir() -> Result<PathBuf> {
    Ok(app_data_dir()?.join("db"))
}

/// Path of the sync configuration file
pub fn config_file_path() -> Result<PathBuf> {
    Ok(app_data_dir()?.join("sync.toml"))
}

fn platform_data_dir() -> Result<PathBuf> {
    if let Some(xdg_data_home) = std::env::var_os("XDG_DATA_HOME") {
        if cfg!(target_os = "linux") {
            return Ok(PathBuf::from(xdg_data_home));
        }
    }
    dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Unable to get platform data directory"))
}
