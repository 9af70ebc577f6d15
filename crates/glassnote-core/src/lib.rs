//! glassnote core: slash-triggered shortcut expansion for a notepad.
//!
//! Manual shortcuts live in a [`ShortcutStore`]; more are generated from
//! pasted spreadsheet rows. Both feed a [`ShortcutRegistry`], which the
//! [`SuggestionController`] and the expansion functions consult while the
//! user types into an [`EditorSurface`].

pub mod config;
pub mod deriver;
pub mod error;
pub mod expansion;
pub mod models;
pub mod notes;
pub mod registry;
pub mod scanner;
pub mod settings;
pub mod slug;
pub mod storage;
pub mod store;
pub mod suggestion;
pub mod surface;

// Re-export common items for convenience
pub use config::{get_config_dir, MAX_SUGGESTIONS, TRIGGER_CHAR};
pub use deriver::derive_shortcuts;
pub use error::{GlassnoteError, Result};
pub use expansion::{expand, expand_all, expand_exact, ExpansionOutcome};
pub use models::{validate_trigger, Shortcut, ShortcutOrigin};
pub use notes::{Note, Notebook};
pub use registry::{RegistryEntry, ShortcutRegistry};
pub use scanner::{scan, CaretContext};
pub use settings::{Contact, Settings};
pub use slug::slugify;
pub use storage::{JsonShortcutFile, MemoryPersistence, ShortcutPersistence};
pub use store::ShortcutStore;
pub use suggestion::{EditorKey, KeyDisposition, SuggestionController, SuggestionState, Suggestions};
pub use surface::{Caret, Document, EditorSurface, NodeId};
