//! Note tabs.

use crate::config::get_notes_file_path;
use crate::error::{GlassnoteError, Result};
use crate::storage::{read_json, write_json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
}

impl Note {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: String::new(),
        }
    }

    /// Whether closing this note would throw away something the user typed
    pub fn has_unsaved_content(&self) -> bool {
        let trimmed = self.content.trim();
        !trimmed.is_empty() && trimmed != "<br>"
    }
}

/// Ordered set of notes plus the one being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notebook {
    notes: Vec<Note>,
    active_id: String,
}

impl Default for Notebook {
    fn default() -> Self {
        let first = Note::new(new_note_id(), "Note 1");
        Self {
            active_id: first.id.clone(),
            notes: vec![first],
        }
    }
}

impl Notebook {
    /// Load the notebook stored at `path`.
    ///
    /// Missing, empty or unreadable files give a fresh notebook with one
    /// empty note.
    pub fn load(path: &Path) -> Self {
        let notes: Vec<Note> = match read_json(path) {
            Ok(Some(notes)) => notes,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable notes file");
                Vec::new()
            }
        };
        Self::from_notes(notes)
    }

    pub fn load_default() -> Self {
        Self::load(&get_notes_file_path())
    }

    pub fn from_notes(notes: Vec<Note>) -> Self {
        let Some(active_id) = notes.first().map(|note| note.id.clone()) else {
            return Self::default();
        };
        Self { notes, active_id }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, &self.notes)
    }

    pub fn save_default(&self) -> Result<()> {
        self.save(&get_notes_file_path())
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub fn active(&self) -> &Note {
        self.notes
            .iter()
            .find(|note| note.id == self.active_id)
            .unwrap_or(&self.notes[0])
    }

    pub fn active_index(&self) -> usize {
        self.notes
            .iter()
            .position(|note| note.id == self.active_id)
            .unwrap_or(0)
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Open a new empty tab and make it active; returns its id
    pub fn add_tab(&mut self) -> String {
        let mut id = new_note_id();
        while self.get(&id).is_some() {
            id.push('0');
        }
        let note = Note::new(id.clone(), format!("Note {}", self.notes.len() + 1));
        self.notes.push(note);
        self.active_id = id.clone();
        id
    }

    /// Close a tab.
    ///
    /// Closing the last tab leaves a single fresh `Note 1`; closing the
    /// active tab activates the last remaining one.
    pub fn close_tab(&mut self, id: &str) -> Result<()> {
        let index = self.position(id)?;
        self.notes.remove(index);

        if self.notes.is_empty() {
            *self = Self::default();
        } else if self.active_id == id {
            self.active_id = self.notes[self.notes.len() - 1].id.clone();
        }
        Ok(())
    }

    pub fn set_active(&mut self, id: &str) -> Result<()> {
        self.position(id)?;
        self.active_id = id.to_string();
        Ok(())
    }

    /// Activate the tab `delta` positions away, wrapping around
    pub fn cycle_active(&mut self, delta: isize) {
        let len = self.notes.len() as isize;
        let next = (self.active_index() as isize + delta).rem_euclid(len) as usize;
        self.active_id = self.notes[next].id.clone();
    }

    pub fn update_content(&mut self, id: &str, content: &str) -> Result<()> {
        let index = self.position(id)?;
        self.notes[index].content = content.to_string();
        Ok(())
    }

    pub fn update_title(&mut self, id: &str, title: &str) -> Result<()> {
        let index = self.position(id)?;
        self.notes[index].title = title.to_string();
        Ok(())
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.notes
            .iter()
            .position(|note| note.id == id)
            .ok_or_else(|| GlassnoteError::NoteNotFound(id.to_string()))
    }
}

fn new_note_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn starts_with_one_empty_note() {
        let notebook = Notebook::default();
        assert_eq!(notebook.notes().len(), 1);
        assert_eq!(notebook.active().title, "Note 1");
        assert!(!notebook.active().has_unsaved_content());
    }

    #[test]
    fn new_tabs_are_numbered_and_activated() {
        let mut notebook = Notebook::default();
        let second = notebook.add_tab();
        let third = notebook.add_tab();
        assert_ne!(second, third);
        assert_eq!(notebook.active_id(), third);
        assert_eq!(notebook.active().title, "Note 3");
    }

    #[test]
    fn closing_active_tab_activates_the_last_one() {
        let mut notebook = Notebook::default();
        let first = notebook.active_id().to_string();
        let second = notebook.add_tab();
        let third = notebook.add_tab();
        notebook.set_active(&second).unwrap();

        notebook.close_tab(&second).unwrap();
        assert_eq!(notebook.active_id(), third);

        notebook.close_tab(&first).unwrap();
        assert_eq!(notebook.active_id(), third);
        assert_eq!(notebook.notes().len(), 1);
    }

    #[test]
    fn closing_the_last_tab_leaves_a_fresh_note() {
        let mut notebook = Notebook::default();
        let id = notebook.active_id().to_string();
        notebook.update_content(&id, "something").unwrap();
        notebook.close_tab(&id).unwrap();
        assert_eq!(notebook.notes().len(), 1);
        assert_eq!(notebook.active().title, "Note 1");
        assert_eq!(notebook.active().content, "");
    }

    #[test]
    fn unknown_ids_are_errors() {
        let mut notebook = Notebook::default();
        assert!(matches!(
            notebook.close_tab("missing"),
            Err(GlassnoteError::NoteNotFound(_))
        ));
        assert!(notebook.set_active("missing").is_err());
    }

    #[test]
    fn unsaved_content_ignores_blank_markup() {
        let mut note = Note::new("1", "Note 1");
        note.content = "  <br> ".into();
        assert!(!note.has_unsaved_content());
        note.content = "draft".into();
        assert!(note.has_unsaved_content());
    }

    #[test]
    fn cycling_wraps_around() {
        let mut notebook = Notebook::default();
        let first = notebook.active_id().to_string();
        notebook.add_tab();
        notebook.cycle_active(1);
        assert_eq!(notebook.active_id(), first);
        notebook.cycle_active(-1);
        assert_eq!(notebook.active_index(), 1);
    }

    #[test]
    fn round_trips_through_disk_and_tolerates_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");

        let mut notebook = Notebook::default();
        let id = notebook.active_id().to_string();
        notebook.update_title(&id, "Groceries").unwrap();
        notebook.update_content(&id, "milk").unwrap();
        notebook.save(&path).unwrap();

        let loaded = Notebook::load(&path);
        assert_eq!(loaded.active().title, "Groceries");
        assert_eq!(loaded.active().content, "milk");

        fs::write(&path, "not json").unwrap();
        assert_eq!(Notebook::load(&path).notes().len(), 1);
    }
}
