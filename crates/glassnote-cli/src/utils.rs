use glassnote_core::config::get_notes_file_path;
use glassnote_core::{
    JsonShortcutFile, Notebook, Result, Settings, ShortcutRegistry, ShortcutStore,
};
use glassnote_ui::{run_notepad, NotepadApp};

pub fn load_store() -> Result<ShortcutStore<JsonShortcutFile>> {
    ShortcutStore::load(JsonShortcutFile::default_location())
}

/// Manual shortcuts plus the ones generated from the saved accounting data
pub fn load_registry() -> Result<ShortcutRegistry> {
    let store = load_store()?;
    let settings = Settings::load_default()?;
    Ok(ShortcutRegistry::rebuild(
        store.entries(),
        &settings.accounting_data,
    ))
}

pub fn open_notepad() -> Result<()> {
    let store = load_store()?;
    let settings = Settings::load_default()?;
    let notebook = Notebook::load_default();

    tracing::info!(
        shortcuts = store.len(),
        notes = notebook.notes().len(),
        "opening notepad"
    );

    let app = NotepadApp::new(notebook, get_notes_file_path(), store, settings);
    run_notepad(app)
}
