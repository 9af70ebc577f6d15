use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use glassnote_core::EditorKey;

/// What a terminal key press means to the notepad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotepadAction {
    /// Plain editing key, routed through the suggestion controller.
    Key(EditorKey),
    SelectLeft,
    SelectRight,
    Paste,
    CreateShortcut,
    /// Open the send menu for the selection.
    SendSelection,
    DeleteLine,
    DuplicateLine,
    NewTab,
    CloseTab,
    PreviousTab,
    NextTab,
    Save,
    Quit,
    Ignore,
}

pub fn map_key(event: KeyEvent) -> NotepadAction {
    // Windows reports releases too
    if event.kind == KeyEventKind::Release {
        return NotepadAction::Ignore;
    }

    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = event.modifiers.contains(KeyModifiers::ALT);
    let shift = event.modifiers.contains(KeyModifiers::SHIFT);

    if ctrl && shift {
        match event.code {
            KeyCode::Char('k' | 'K') => return NotepadAction::DeleteLine,
            KeyCode::Char('d' | 'D') | KeyCode::Down => return NotepadAction::DuplicateLine,
            _ => {}
        }
    }

    if ctrl {
        return match event.code {
            KeyCode::Char('v') => NotepadAction::Paste,
            KeyCode::Char('k') => NotepadAction::CreateShortcut,
            KeyCode::Char('e') => NotepadAction::SendSelection,
            KeyCode::Char('n') => NotepadAction::NewTab,
            KeyCode::Char('w') => NotepadAction::CloseTab,
            KeyCode::Char('s') => NotepadAction::Save,
            KeyCode::Char('q') | KeyCode::Char('c') => NotepadAction::Quit,
            _ => NotepadAction::Ignore,
        };
    }

    match event.code {
        KeyCode::Down if alt && shift => NotepadAction::DuplicateLine,
        KeyCode::Left if alt => NotepadAction::PreviousTab,
        KeyCode::Right if alt => NotepadAction::NextTab,
        KeyCode::Left if shift => NotepadAction::SelectLeft,
        KeyCode::Right if shift => NotepadAction::SelectRight,
        KeyCode::Char(c) if !alt => NotepadAction::Key(EditorKey::Char(c)),
        KeyCode::Enter => NotepadAction::Key(EditorKey::Enter),
        KeyCode::Tab => NotepadAction::Key(EditorKey::Tab),
        KeyCode::Backspace => NotepadAction::Key(EditorKey::Backspace),
        KeyCode::Up => NotepadAction::Key(EditorKey::Up),
        KeyCode::Down => NotepadAction::Key(EditorKey::Down),
        KeyCode::Left => NotepadAction::Key(EditorKey::Left),
        KeyCode::Right => NotepadAction::Key(EditorKey::Right),
        KeyCode::Esc => NotepadAction::Key(EditorKey::Escape),
        _ => NotepadAction::Key(EditorKey::Other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn plain_keys_become_editor_keys() {
        assert_eq!(
            map_key(key(KeyCode::Char('/'), KeyModifiers::NONE)),
            NotepadAction::Key(EditorKey::Char('/'))
        );
        assert_eq!(
            map_key(key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            NotepadAction::Key(EditorKey::Char('A'))
        );
        assert_eq!(
            map_key(key(KeyCode::Esc, KeyModifiers::NONE)),
            NotepadAction::Key(EditorKey::Escape)
        );
        assert_eq!(
            map_key(key(KeyCode::F(5), KeyModifiers::NONE)),
            NotepadAction::Key(EditorKey::Other)
        );
    }

    #[test]
    fn control_chords_are_commands() {
        assert_eq!(
            map_key(key(KeyCode::Char('k'), KeyModifiers::CONTROL)),
            NotepadAction::CreateShortcut
        );
        assert_eq!(
            map_key(key(KeyCode::Char('v'), KeyModifiers::CONTROL)),
            NotepadAction::Paste
        );
        assert_eq!(
            map_key(key(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            NotepadAction::Ignore
        );
    }

    #[test]
    fn modified_arrows_select_or_switch_tabs() {
        assert_eq!(
            map_key(key(KeyCode::Left, KeyModifiers::SHIFT)),
            NotepadAction::SelectLeft
        );
        assert_eq!(
            map_key(key(KeyCode::Right, KeyModifiers::ALT)),
            NotepadAction::NextTab
        );
        assert_eq!(
            map_key(key(KeyCode::Right, KeyModifiers::NONE)),
            NotepadAction::Key(EditorKey::Right)
        );
    }

    #[test]
    fn line_commands_need_shift() {
        let ctrl_shift = KeyModifiers::CONTROL | KeyModifiers::SHIFT;
        assert_eq!(
            map_key(key(KeyCode::Char('K'), ctrl_shift)),
            NotepadAction::DeleteLine
        );
        assert_eq!(
            map_key(key(KeyCode::Char('d'), ctrl_shift)),
            NotepadAction::DuplicateLine
        );
        assert_eq!(
            map_key(key(KeyCode::Down, KeyModifiers::ALT | KeyModifiers::SHIFT)),
            NotepadAction::DuplicateLine
        );
        assert_eq!(
            map_key(key(KeyCode::Char('v'), ctrl_shift)),
            NotepadAction::Paste
        );
        assert_eq!(
            map_key(key(KeyCode::Char('e'), KeyModifiers::CONTROL)),
            NotepadAction::SendSelection
        );
    }

    #[test]
    fn releases_are_ignored() {
        let mut event = key(KeyCode::Char('a'), KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(map_key(event), NotepadAction::Ignore);
    }
}
