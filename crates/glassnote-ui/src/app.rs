//! Notepad state, independent of the terminal.

use crate::keymap::NotepadAction;
use glassnote_bridge::{compose_message, BridgeClient, Credentials, MessageTarget};
use glassnote_core::{
    models::is_trigger_char, validate_trigger, Document, EditorKey, KeyDisposition, Notebook,
    Result, Settings, ShortcutPersistence, ShortcutRegistry, ShortcutStore, SuggestionController,
};
use std::path::PathBuf;

const TAB_SPACES: &str = "    ";

/// Modal prompt currently shown over the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Editing,
    /// Typing the trigger for a shortcut made from the selection.
    NamingShortcut { input: String, content: String },
    ConfirmOverwrite { trigger: String, content: String },
    ConfirmClose { id: String },
    /// Picking where the selected text goes; `selected` indexes
    /// [`NotepadApp::send_targets`].
    ChoosingTarget { text: String, selected: usize },
}

pub struct NotepadApp<P: ShortcutPersistence> {
    notebook: Notebook,
    notes_path: PathBuf,
    document: Document,
    store: ShortcutStore<P>,
    settings: Settings,
    registry: ShortcutRegistry,
    controller: SuggestionController,
    mode: Mode,
    status: Option<String>,
    quit: bool,
}

impl<P: ShortcutPersistence> NotepadApp<P> {
    pub fn new(
        notebook: Notebook,
        notes_path: PathBuf,
        store: ShortcutStore<P>,
        settings: Settings,
    ) -> Self {
        let registry = ShortcutRegistry::rebuild(store.entries(), &settings.accounting_data);
        let document = Document::from_text(&notebook.active().content);
        Self {
            notebook,
            notes_path,
            document,
            store,
            settings,
            registry,
            controller: SuggestionController::new(),
            mode: Mode::Editing,
            status: None,
            quit: false,
        }
    }

    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn store(&self) -> &ShortcutStore<P> {
        &self.store
    }

    pub fn registry(&self) -> &ShortcutRegistry {
        &self.registry
    }

    pub fn controller(&self) -> &SuggestionController {
        &self.controller
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Menu entries for sending the selection: plain, verification, then
    /// one per saved contact.
    pub fn send_targets(&self) -> Vec<(String, MessageTarget)> {
        let mut targets = vec![
            ("Send".to_string(), MessageTarget::Default),
            ("Send for verification".to_string(), MessageTarget::Verification),
        ];
        targets.extend(self.settings.contacts.iter().map(|contact| {
            (
                format!("Send to {}", contact.name),
                MessageTarget::Chat(contact.chat_id.clone()),
            )
        }));
        targets
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Row and column of the caret within the active note
    pub fn caret_position(&self) -> (usize, usize) {
        let offset = self.document.global_offset(self.document.cursor());
        let text = self.document.text();
        let before: Vec<char> = text.chars().take(offset).collect();
        let row = before.iter().filter(|c| **c == '\n').count();
        let col = before.iter().rev().take_while(|c| **c != '\n').count();
        (row, col)
    }

    pub fn handle(&mut self, action: NotepadAction) -> Result<()> {
        if action == NotepadAction::Ignore {
            return Ok(());
        }
        self.status = None;

        match self.mode.clone() {
            Mode::Editing => self.handle_editing(action),
            Mode::NamingShortcut { input, content } => {
                self.handle_naming(action, input, content)
            }
            Mode::ConfirmOverwrite { trigger, content } => {
                if confirmed(action) {
                    self.store.add(&trigger, &content, true)?;
                    self.shortcuts_changed();
                    self.status = Some(format!("Shortcut /{} overwritten", trigger));
                } else {
                    self.status = Some(format!("Kept the existing /{}", trigger));
                }
                self.mode = Mode::Editing;
                Ok(())
            }
            Mode::ConfirmClose { id } => {
                self.mode = Mode::Editing;
                if confirmed(action) {
                    self.close_tab(&id)?;
                }
                Ok(())
            }
            Mode::ChoosingTarget { text, selected } => self.handle_choosing(action, text, selected),
        }
    }

    /// Insert clipboard text at the caret, normalizing line endings.
    pub fn paste(&mut self, text: &str) {
        if self.mode != Mode::Editing {
            return;
        }
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        self.document.insert_str(&normalized);
        self.controller.after_input(&self.document, &self.registry);
        self.sync_note();
    }

    /// Write every note to disk.
    pub fn save(&mut self) -> Result<()> {
        self.sync_note();
        self.notebook.save(&self.notes_path)?;
        tracing::debug!(path = %self.notes_path.display(), "notes saved");
        Ok(())
    }

    fn handle_editing(&mut self, action: NotepadAction) -> Result<()> {
        match action {
            NotepadAction::Key(key) => self.handle_editor_key(key),
            NotepadAction::SelectLeft => {
                self.document.move_left(true);
                self.controller.after_caret_move(&self.document, &self.registry);
            }
            NotepadAction::SelectRight => {
                self.document.move_right(true);
                self.controller.after_caret_move(&self.document, &self.registry);
            }
            NotepadAction::CreateShortcut => self.begin_shortcut(),
            NotepadAction::SendSelection => self.begin_send(),
            NotepadAction::DeleteLine => self.line_command(Document::delete_line),
            NotepadAction::DuplicateLine => self.line_command(Document::duplicate_line),
            NotepadAction::NewTab => {
                self.sync_note();
                self.notebook.add_tab();
                self.load_active();
            }
            NotepadAction::CloseTab => {
                self.sync_note();
                let active = self.notebook.active();
                if active.has_unsaved_content() {
                    self.mode = Mode::ConfirmClose {
                        id: active.id.clone(),
                    };
                } else {
                    let id = active.id.clone();
                    self.close_tab(&id)?;
                }
            }
            NotepadAction::PreviousTab | NotepadAction::NextTab => {
                self.sync_note();
                let delta = if action == NotepadAction::NextTab { 1 } else { -1 };
                self.notebook.cycle_active(delta);
                self.load_active();
            }
            NotepadAction::Save => {
                self.save()?;
                self.status = Some("Saved".to_string());
            }
            NotepadAction::Quit => {
                self.save()?;
                self.quit = true;
            }
            // The terminal loop reads the clipboard and calls `paste`
            NotepadAction::Paste | NotepadAction::Ignore => {}
        }
        Ok(())
    }

    fn handle_editor_key(&mut self, key: EditorKey) {
        let disposition = self
            .controller
            .handle_key(key, &mut self.document, &self.registry);
        if disposition == KeyDisposition::Consumed {
            self.sync_note();
            return;
        }

        match key {
            EditorKey::Char(c) => self.document.insert_char(c),
            EditorKey::Enter => self.document.insert_char('\n'),
            EditorKey::Tab => self.document.insert_str(TAB_SPACES),
            EditorKey::Backspace => self.document.delete_backward(),
            EditorKey::Left => self.document.move_left(false),
            EditorKey::Right => self.document.move_right(false),
            EditorKey::Up => self.document.move_up(),
            EditorKey::Down => self.document.move_down(),
            EditorKey::Escape | EditorKey::Other => return,
        }

        match key {
            EditorKey::Left | EditorKey::Right => {
                self.controller.after_caret_move(&self.document, &self.registry)
            }
            EditorKey::Up | EditorKey::Down => {}
            _ => {
                self.controller.after_input(&self.document, &self.registry);
                self.sync_note();
            }
        }
    }

    fn begin_shortcut(&mut self) {
        match self.document.selected_text() {
            Some(content) if !content.trim().is_empty() => {
                self.controller.dismiss();
                self.mode = Mode::NamingShortcut {
                    input: String::new(),
                    content,
                };
            }
            _ => self.status = Some("Select some text first (Shift+Left/Right)".to_string()),
        }
    }

    fn handle_naming(
        &mut self,
        action: NotepadAction,
        mut input: String,
        content: String,
    ) -> Result<()> {
        match action {
            NotepadAction::Key(EditorKey::Escape) => {
                self.mode = Mode::Editing;
                return Ok(());
            }
            NotepadAction::Key(EditorKey::Backspace) => {
                input.pop();
            }
            NotepadAction::Key(EditorKey::Char(c)) if is_trigger_char(c) => input.push(c),
            NotepadAction::Key(EditorKey::Enter) => {
                if let Err(e) = validate_trigger(&input) {
                    self.status = Some(e.to_string());
                } else if self.store.add(&input, &content, false)? {
                    self.shortcuts_changed();
                    self.status = Some(format!("Shortcut /{} created", input));
                    self.mode = Mode::Editing;
                    return Ok(());
                } else {
                    self.mode = Mode::ConfirmOverwrite {
                        trigger: input,
                        content,
                    };
                    return Ok(());
                }
            }
            _ => {}
        }
        self.mode = Mode::NamingShortcut { input, content };
        Ok(())
    }

    fn line_command(&mut self, command: fn(&mut Document)) {
        command(&mut self.document);
        self.controller.dismiss();
        self.sync_note();
    }

    fn begin_send(&mut self) {
        if !self.settings.has_bridge_credentials() {
            self.status = Some(
                "Set API id, API hash and phone first (glassnote settings bridge)".to_string(),
            );
            return;
        }
        match self.document.selected_text() {
            Some(text) if !text.trim().is_empty() => {
                self.controller.dismiss();
                self.mode = Mode::ChoosingTarget { text, selected: 0 };
            }
            _ => self.status = Some("Please select some text to send".to_string()),
        }
    }

    fn handle_choosing(
        &mut self,
        action: NotepadAction,
        text: String,
        selected: usize,
    ) -> Result<()> {
        let count = self.send_targets().len();
        match action {
            NotepadAction::Key(EditorKey::Up) => {
                self.mode = Mode::ChoosingTarget {
                    text,
                    selected: (selected + count - 1) % count,
                };
            }
            NotepadAction::Key(EditorKey::Down) => {
                self.mode = Mode::ChoosingTarget {
                    text,
                    selected: (selected + 1) % count,
                };
            }
            NotepadAction::Key(EditorKey::Enter) => {
                self.mode = Mode::Editing;
                let (_, target) = self.send_targets().swap_remove(selected);
                self.send_text(&text, &target)?;
            }
            NotepadAction::Key(EditorKey::Escape) => self.mode = Mode::Editing,
            _ => {}
        }
        Ok(())
    }

    fn send_text(&mut self, text: &str, target: &MessageTarget) -> Result<()> {
        let credentials = Credentials::from_settings(&self.settings)?;
        let (message, chat_id) = compose_message(text, target, &self.settings)?;
        let client = BridgeClient::from_settings(&self.settings)?;

        // One runtime per message
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(client.send(&credentials, &message, chat_id.as_deref()))?;

        self.status = Some("Message sent".to_string());
        Ok(())
    }

    fn close_tab(&mut self, id: &str) -> Result<()> {
        self.notebook.close_tab(id)?;
        self.load_active();
        Ok(())
    }

    fn load_active(&mut self) {
        self.document = Document::from_text(&self.notebook.active().content);
        self.controller.dismiss();
    }

    fn sync_note(&mut self) {
        let id = self.notebook.active_id().to_string();
        let text = self.document.text();
        if let Err(e) = self.notebook.update_content(&id, &text) {
            tracing::warn!(error = %e, "active note vanished");
        }
    }

    fn shortcuts_changed(&mut self) {
        self.registry =
            ShortcutRegistry::rebuild(self.store.entries(), &self.settings.accounting_data);
    }
}

fn confirmed(action: NotepadAction) -> bool {
    matches!(
        action,
        NotepadAction::Key(EditorKey::Char('y')) | NotepadAction::Key(EditorKey::Char('Y'))
    )
}
