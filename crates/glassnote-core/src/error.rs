use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlassnoteError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid shortcut '{0}': must start with a letter and contain only letters, digits, '_' or '-'")]
    InvalidTrigger(String),
    #[error("Shortcut '/{0}' already exists")]
    DuplicateTrigger(String),
    #[error("Shortcut '/{0}' not found")]
    ShortcutNotFound(String),
    #[error("Note '{0}' not found")]
    NoteNotFound(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Bridge error: {0}")]
    Bridge(String),
    #[error("Clipboard error: {0}")]
    Clipboard(String),
    #[error("Terminal error: {0}")]
    Terminal(String),
    #[error("Error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, GlassnoteError>;
