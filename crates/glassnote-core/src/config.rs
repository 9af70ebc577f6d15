use crate::error::Result;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Character that introduces a shortcut trigger while typing.
pub const TRIGGER_CHAR: char = '/';
/// Maximum number of entries shown in the suggestion popup.
pub const MAX_SUGGESTIONS: usize = 5;
/// Prefix of every trigger generated from tabular data.
pub const GENERATED_PREFIX: &str = "email_";
pub const DEFAULT_BRIDGE_URL: &str = "http://localhost:5000";

pub const SHORTCUTS_FILENAME: &str = "shortcuts.json";
pub const NOTES_FILENAME: &str = "notes.json";
pub const SETTINGS_FILENAME: &str = "settings.json";
pub const LOG_FILENAME: &str = "glassnote.log";

/// Environment variable overriding the configuration directory.
pub const HOME_ENV: &str = "GLASSNOTE_HOME";

/// Get the glassnote configuration directory
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = env::var(HOME_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    env::var("HOME")
        .map(|home| PathBuf::from(home).join(".glassnote"))
        .unwrap_or_else(|_| PathBuf::from(".glassnote"))
}

/// Ensure the configuration directory exists
pub fn ensure_config_dir() -> Result<PathBuf> {
    let config_dir = get_config_dir();
    if !config_dir.exists() {
        tracing::info!(path = %config_dir.display(), "creating config directory");
        fs::create_dir_all(&config_dir)?;
    }
    Ok(config_dir)
}

/// Create the parent directory of `path` if it is missing
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

pub fn get_shortcuts_file_path() -> PathBuf {
    get_config_dir().join(SHORTCUTS_FILENAME)
}

pub fn get_notes_file_path() -> PathBuf {
    get_config_dir().join(NOTES_FILENAME)
}

pub fn get_settings_file_path() -> PathBuf {
    get_config_dir().join(SETTINGS_FILENAME)
}

pub fn get_log_file_path() -> PathBuf {
    get_config_dir().join(LOG_FILENAME)
}
