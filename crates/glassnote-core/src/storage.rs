//! JSON file persistence for shortcuts, notes and settings.

use crate::config::{ensure_parent_dir, get_shortcuts_file_path};
use crate::error::Result;
use crate::models::Shortcut;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Load-on-start and save-on-mutation boundary of the shortcut store.
pub trait ShortcutPersistence {
    fn load_all(&self) -> Result<Vec<Shortcut>>;
    fn put_all(&mut self, shortcuts: &[Shortcut]) -> Result<()>;
}

/// Read a JSON document, treating a missing or blank file as `None`
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;

    // Handle empty database file
    if content.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(serde_json::from_str(&content)?))
}

/// Write `value` as pretty JSON, creating parent directories as needed
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let serialized = serde_json::to_string_pretty(value)?;
    fs::write(path, serialized)?;
    Ok(())
}

/// Shortcuts stored as a JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonShortcutFile {
    path: PathBuf,
}

impl JsonShortcutFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The shortcut file in the configuration directory
    pub fn default_location() -> Self {
        Self::new(get_shortcuts_file_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ShortcutPersistence for JsonShortcutFile {
    fn load_all(&self) -> Result<Vec<Shortcut>> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }

    fn put_all(&mut self, shortcuts: &[Shortcut]) -> Result<()> {
        tracing::debug!(path = %self.path.display(), count = shortcuts.len(), "saving shortcuts");
        write_json(&self.path, shortcuts)
    }
}

/// Persistence that keeps nothing; useful for hosts without a disk.
#[derive(Debug, Default, Clone)]
pub struct MemoryPersistence {
    pub saved: Vec<Shortcut>,
    pub writes: usize,
}

impl ShortcutPersistence for MemoryPersistence {
    fn load_all(&self) -> Result<Vec<Shortcut>> {
        Ok(self.saved.clone())
    }

    fn put_all(&mut self, shortcuts: &[Shortcut]) -> Result<()> {
        self.saved = shortcuts.to_vec();
        self.writes += 1;
        Ok(())
    }
}
