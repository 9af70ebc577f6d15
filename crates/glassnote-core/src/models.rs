use crate::error::{GlassnoteError, Result};
use serde::{Deserialize, Serialize};

/// A trigger-to-content mapping inserted verbatim on expansion.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub trigger: String,
    pub content: String,
}

impl Shortcut {
    pub fn new(trigger: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            content: content.into(),
        }
    }

    /// Single-line preview of the content, for lists and popups
    pub fn preview(&self, max_chars: usize) -> String {
        let flat: String = self
            .content
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        if flat.chars().count() <= max_chars {
            flat
        } else {
            let mut cut: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
            cut.push('…');
            cut
        }
    }
}

/// Where a registry entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortcutOrigin {
    Manual,
    Generated,
}

impl ShortcutOrigin {
    pub fn label(&self) -> &'static str {
        match self {
            ShortcutOrigin::Manual => "manual",
            ShortcutOrigin::Generated => "generated",
        }
    }
}

/// Check whether a character may appear inside a trigger.
pub fn is_trigger_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Validate a manually entered trigger.
///
/// A trigger starts with an ASCII letter and continues with ASCII letters,
/// digits, underscores or hyphens. This runs before anything reaches the
/// shortcut store; the store itself accepts whatever it is given.
pub fn validate_trigger(trigger: &str) -> Result<()> {
    let mut chars = trigger.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars.all(is_trigger_char),
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(GlassnoteError::InvalidTrigger(trigger.to_string()))
    }
}
