mod app;
mod common;
mod keymap;
mod notepad;

// Public API
pub use app::{Mode, NotepadApp};
pub use keymap::{map_key, NotepadAction};
pub use notepad::run_notepad;
