//! Centralized path management for tooli's configuration and version cache.
//!
//! | File | Location |
//! |------|----------|
//! | Configuration | `$XDG_CONFIG_HOME/tool-installer/config.json` (default `~/.config/...`) |
//! | Version cache | `$XDG_CACHE_HOME/tool-installer/tool-versions.json` (default `~/.cache/...`) |
//!
//! The same layout is used on every platform so a configuration file can be
//! shared between machines.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Directory name used below the config and cache base directories.
pub const APP_DIR_NAME: &str = "tool-installer";

/// Filename of the configuration.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Filename of the version cache.
pub const CACHE_FILE_NAME: &str = "tool-versions.json";

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| Error::configuration("Could not find the home directory"))
}

fn xdg_base(var: &str, fallback: &str) -> Result<PathBuf> {
    match std::env::var(var) {
        Ok(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => Ok(home_dir()?.join(fallback)),
    }
}

/// Get the default configuration file path.
///
/// Resolution order:
/// 1. `XDG_CONFIG_HOME` environment variable
/// 2. `~/.config`
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_file() -> Result<PathBuf> {
    Ok(xdg_base("XDG_CONFIG_HOME", ".config")?
        .join(APP_DIR_NAME)
        .join(CONFIG_FILE_NAME))
}

/// Get the version cache file path.
///
/// Resolution order:
/// 1. `XDG_CACHE_HOME` environment variable
/// 2. `~/.cache`
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn cache_file() -> Result<PathBuf> {
    Ok(xdg_base("XDG_CACHE_HOME", ".cache")?
        .join(APP_DIR_NAME)
        .join(CACHE_FILE_NAME))
}

/// Expand a leading `~` to the user's home directory.
///
/// Paths without a leading `~` (and `~user` forms) are returned unchanged.
///
/// # Errors
///
/// Returns an error if the path needs expanding and the home directory
/// cannot be determined.
pub fn expand_tilde(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let Some(text) = path.to_str() else {
        return Ok(path.to_path_buf());
    };

    if text == "~" {
        return home_dir();
    }
    match text.strip_prefix("~/").or_else(|| text.strip_prefix("~\\")) {
        Some(rest) => Ok(home_dir()?.join(rest)),
        None => Ok(path.to_path_buf()),
    }
}

/// Create `path` and its parents.
///
/// # Errors
///
/// Returns an I/O error naming the directory when creation fails.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .map_err(|e| Error::io(e, path, "create directory"))
}
