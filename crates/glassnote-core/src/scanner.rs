//! Find the trigger fragment the user is typing right before the caret.

use crate::config::TRIGGER_CHAR;
use crate::models::is_trigger_char;
use crate::surface::{byte_index, Caret, EditorSurface};

/// Snapshot of the text immediately preceding the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaretContext {
    pub caret: Caret,
    /// Trigger chars typed after the slash, without the slash.
    pub fragment: String,
}

impl CaretContext {
    /// Number of chars an expansion removes: the fragment plus its slash
    pub fn span_len(&self) -> usize {
        self.fragment.chars().count() + 1
    }

    /// Offset where the slash sits, or `None` if the span would start
    /// before the beginning of the node
    pub fn deletion_start(&self) -> Option<usize> {
        self.caret.offset.checked_sub(self.span_len())
    }
}

/// Match `/` followed by one or more trigger chars at the end of `before_caret`.
///
/// Returns the fragment without the slash.
pub fn trailing_fragment(before_caret: &str) -> Option<&str> {
    let fragment_start = before_caret
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_trigger_char(*c))
        .last()
        .map(|(index, _)| index)?;

    let slash = before_caret[..fragment_start].chars().next_back()?;
    (slash == TRIGGER_CHAR).then(|| &before_caret[fragment_start..])
}

/// Read the caret context from `surface` without mutating it.
///
/// `None` when there is no usable caret or no trigger fragment before it.
pub fn scan<S: EditorSurface + ?Sized>(surface: &S) -> Option<CaretContext> {
    let caret = surface.caret()?;
    let text = surface.node_text(caret.node)?;
    let before_caret = &text[..byte_index(text, caret.offset)];

    trailing_fragment(before_caret).map(|fragment| CaretContext {
        caret,
        fragment: fragment.to_string(),
    })
}
