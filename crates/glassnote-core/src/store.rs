//! Manually created shortcuts.

use crate::error::Result;
use crate::models::Shortcut;
use crate::storage::ShortcutPersistence;

/// Ordered set of manual shortcuts, written through `P` on every change.
///
/// Triggers are not validated here; callers run
/// [`validate_trigger`](crate::models::validate_trigger) first.
pub struct ShortcutStore<P: ShortcutPersistence> {
    entries: Vec<Shortcut>,
    persistence: P,
}

impl<P: ShortcutPersistence> ShortcutStore<P> {
    /// Load the store from its persistence
    pub fn load(persistence: P) -> Result<Self> {
        let entries = persistence.load_all()?;
        tracing::debug!(count = entries.len(), "loaded manual shortcuts");
        Ok(Self {
            entries,
            persistence,
        })
    }

    /// Add a shortcut, or replace an existing one when `overwrite` is set.
    ///
    /// Returns `Ok(false)` without touching anything when the trigger
    /// exists and `overwrite` is false.
    pub fn add(&mut self, trigger: &str, content: &str, overwrite: bool) -> Result<bool> {
        match self.position(trigger) {
            Some(_) if !overwrite => return Ok(false),
            Some(index) => self.entries[index].content = content.to_string(),
            None => self.entries.push(Shortcut::new(trigger, content)),
        }
        self.persist()?;
        Ok(true)
    }

    /// Delete a shortcut; missing triggers are ignored
    pub fn remove(&mut self, trigger: &str) -> Result<()> {
        if let Some(index) = self.position(trigger) {
            self.entries.remove(index);
            self.persist()?;
        }
        Ok(())
    }

    /// Replace the content of an existing shortcut.
    ///
    /// Returns `Ok(false)` if no shortcut has that trigger.
    pub fn edit(&mut self, trigger: &str, new_content: &str) -> Result<bool> {
        let Some(index) = self.position(trigger) else {
            return Ok(false);
        };
        self.entries[index].content = new_content.to_string();
        self.persist()?;
        Ok(true)
    }

    pub fn get(&self, trigger: &str) -> Option<&Shortcut> {
        self.entries.iter().find(|entry| entry.trigger == trigger)
    }

    pub fn contains(&self, trigger: &str) -> bool {
        self.position(trigger).is_some()
    }

    /// Snapshot of the manual shortcuts in insertion order
    pub fn entries(&self) -> &[Shortcut] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    fn position(&self, trigger: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.trigger == trigger)
    }

    fn persist(&mut self) -> Result<()> {
        self.persistence.put_all(&self.entries)
    }
}
