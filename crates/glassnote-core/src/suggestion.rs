//! State machine behind the shortcut suggestion popup.
//!
//! The host forwards key-down events to [`SuggestionController::handle_key`]
//! before applying its own default behaviour, and reports text input and
//! caret movement afterwards so the controller can re-scan.

use crate::expansion::{expand, expand_exact, ExpansionOutcome};
use crate::models::Shortcut;
use crate::registry::ShortcutRegistry;
use crate::scanner::scan;
use crate::surface::{Caret, EditorSurface};

/// Keys the controller cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Escape,
    Other,
}

/// Whether the host should still apply the key's default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// The controller handled the key; suppress the default action.
    Consumed,
    PassThrough,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestions {
    pub matches: Vec<Shortcut>,
    pub active_index: usize,
    /// Where the `/` of the fragment sits, for placing the popup.
    pub anchor: Caret,
    pub partial: String,
}

impl Suggestions {
    pub fn active(&self) -> &Shortcut {
        &self.matches[self.active_index]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SuggestionState {
    #[default]
    Hidden,
    Showing(Suggestions),
}

#[derive(Debug, Default)]
pub struct SuggestionController {
    state: SuggestionState,
}

impl SuggestionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SuggestionState {
        &self.state
    }

    pub fn is_showing(&self) -> bool {
        matches!(self.state, SuggestionState::Showing(_))
    }

    pub fn suggestions(&self) -> Option<&Suggestions> {
        match &self.state {
            SuggestionState::Showing(suggestions) => Some(suggestions),
            SuggestionState::Hidden => None,
        }
    }

    /// Handle a key-down event before the host applies it.
    ///
    /// While the popup shows, Tab/Enter commit the active match, Up/Down
    /// move the highlight and Escape closes it; those keys are consumed.
    /// A delimiter (space, or Enter/Tab with the popup hidden) first
    /// expands an exactly matching trigger and then passes through so the
    /// host still inserts it.
    pub fn handle_key<S: EditorSurface + ?Sized>(
        &mut self,
        key: EditorKey,
        surface: &mut S,
        registry: &ShortcutRegistry,
    ) -> KeyDisposition {
        if let SuggestionState::Showing(suggestions) = &mut self.state {
            match key {
                EditorKey::Tab | EditorKey::Enter => {
                    let index = suggestions.active_index;
                    self.commit(index, surface);
                    return KeyDisposition::Consumed;
                }
                EditorKey::Up => {
                    suggestions.active_index = suggestions.active_index.saturating_sub(1);
                    return KeyDisposition::Consumed;
                }
                EditorKey::Down => {
                    let last = suggestions.matches.len().saturating_sub(1);
                    suggestions.active_index = (suggestions.active_index + 1).min(last);
                    return KeyDisposition::Consumed;
                }
                EditorKey::Escape => {
                    self.dismiss();
                    return KeyDisposition::Consumed;
                }
                _ => {}
            }
        }

        if matches!(key, EditorKey::Char(' ') | EditorKey::Enter | EditorKey::Tab)
            && expand_exact(surface, registry).is_expanded()
        {
            self.dismiss();
        }
        KeyDisposition::PassThrough
    }

    /// Re-scan after the host inserted or deleted text.
    pub fn after_input<S: EditorSurface + ?Sized>(
        &mut self,
        surface: &S,
        registry: &ShortcutRegistry,
    ) {
        self.refresh(surface, registry);
    }

    /// Re-scan after the caret moved horizontally or was placed by a click.
    pub fn after_caret_move<S: EditorSurface + ?Sized>(
        &mut self,
        surface: &S,
        registry: &ShortcutRegistry,
    ) {
        self.refresh(surface, registry);
    }

    /// Expand `matches[index]` at the current caret and close the popup.
    pub fn commit<S: EditorSurface + ?Sized>(
        &mut self,
        index: usize,
        surface: &mut S,
    ) -> ExpansionOutcome {
        let state = std::mem::take(&mut self.state);
        let SuggestionState::Showing(suggestions) = state else {
            return ExpansionOutcome::Aborted;
        };
        let Some(shortcut) = suggestions.matches.get(index) else {
            return ExpansionOutcome::Aborted;
        };
        let Some(ctx) = scan(&*surface) else {
            tracing::debug!("caret context vanished before commit");
            return ExpansionOutcome::Aborted;
        };
        expand(surface, &ctx, shortcut)
    }

    /// Close the popup, e.g. when the caret leaves the editable region.
    pub fn dismiss(&mut self) {
        self.state = SuggestionState::Hidden;
    }

    fn refresh<S: EditorSurface + ?Sized>(&mut self, surface: &S, registry: &ShortcutRegistry) {
        self.state = scan(surface)
            .and_then(|ctx| {
                let matches: Vec<Shortcut> = registry
                    .find_by_prefix(&ctx.fragment)
                    .into_iter()
                    .cloned()
                    .collect();
                if matches.is_empty() {
                    return None;
                }
                let anchor = Caret::new(ctx.caret.node, ctx.deletion_start()?);
                Some(SuggestionState::Showing(Suggestions {
                    matches,
                    active_index: 0,
                    anchor,
                    partial: ctx.fragment,
                }))
            })
            .unwrap_or_default();
    }
}
