use crate::cli::{BridgeCommand, Commands, SettingsCommand};
use crate::utils::{load_registry, load_store, open_notepad};
use glassnote_bridge::{compose_message, BridgeClient, Credentials, LoginOutcome, MessageTarget};
use glassnote_core::{
    derive_shortcuts, expand_all, expand_exact, validate_trigger, Caret, Document, EditorSurface,
    GlassnoteError, NodeId, Notebook, Result, Settings, ShortcutOrigin, ShortcutRegistry,
};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};

const LIST_PREVIEW_CHARS: usize = 60;

pub fn handle_command(command: Option<Commands>) -> Result<()> {
    match command {
        Some(command) => handle_subcommand(command),
        None => open_notepad(), // Default: open the notepad when no command provided
    }
}

fn handle_subcommand(command: Commands) -> Result<()> {
    match command {
        Commands::Add {
            trigger,
            content,
            force,
        } => handle_add(&trigger, &content, force),
        Commands::Delete { trigger } => {
            let mut store = load_store()?;
            if !store.contains(&trigger) {
                return Err(GlassnoteError::ShortcutNotFound(trigger));
            }
            store
                .remove(&trigger)
                .map(|_| println!("Shortcut /{} deleted", trigger))
        }
        Commands::Update { trigger, content } => {
            let mut store = load_store()?;
            if store.edit(&trigger, &content)? {
                println!("Shortcut /{} updated", trigger);
                Ok(())
            } else {
                Err(GlassnoteError::ShortcutNotFound(trigger))
            }
        }
        Commands::List { generated, all } => handle_list(generated, all),
        Commands::Import { file } => handle_import(&file),
        Commands::Expand { text, cursor } => {
            let registry = load_registry()?;
            println!("{}", expand_text(&text, cursor, &registry));
            Ok(())
        }
        Commands::Settings { action } => handle_settings(action.unwrap_or(SettingsCommand::Show)),
        Commands::Notes => handle_notes(),
        Commands::Export { output } => {
            let json = export_json(&load_registry()?)?;
            match output {
                Some(path) => {
                    fs::write(&path, json)?;
                    println!("Shortcuts written to {}", path.display());
                }
                None => println!("{}", json),
            }
            Ok(())
        }
        Commands::Bridge { action } => handle_bridge(action),
    }
}

fn handle_add(trigger: &str, content: &str, force: bool) -> Result<()> {
    let trigger = trigger.trim_start_matches(glassnote_core::TRIGGER_CHAR);
    validate_trigger(trigger)?;

    let mut store = load_store()?;
    if store.add(trigger, content, force)? {
        println!("Shortcut /{} saved", trigger);
        Ok(())
    } else {
        eprintln!("Use --force to overwrite it.");
        Err(GlassnoteError::DuplicateTrigger(trigger.to_string()))
    }
}

fn handle_list(generated: bool, all: bool) -> Result<()> {
    let registry = load_registry()?;
    let entries: Vec<_> = registry
        .entries()
        .iter()
        .filter(|entry| {
            all || (generated && entry.origin == ShortcutOrigin::Generated)
                || (!generated && entry.origin == ShortcutOrigin::Manual)
        })
        .collect();

    if entries.is_empty() {
        println!("No shortcuts found.");
        return Ok(());
    }

    let width = entries
        .iter()
        .map(|entry| entry.shortcut.trigger.chars().count())
        .max()
        .unwrap_or(0);
    for entry in entries {
        let label = if all {
            format!("[{}] ", entry.origin.label())
        } else {
            String::new()
        };
        println!(
            "{}/{:<width$}  {}",
            label,
            entry.shortcut.trigger,
            entry.shortcut.preview(LIST_PREVIEW_CHARS),
            width = width
        );
    }
    Ok(())
}

fn handle_import(file: &str) -> Result<()> {
    let data = if file == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(file)?
    };

    let derived = derive_shortcuts(&data);
    let store = load_store()?;
    let shadowed: Vec<_> = derived
        .iter()
        .filter(|shortcut| store.contains(&shortcut.trigger))
        .map(|shortcut| shortcut.trigger.as_str())
        .collect();

    let mut settings = Settings::load_default()?;
    settings.accounting_data = data;
    settings.save_default()?;

    println!("Imported {} generated shortcuts", derived.len());
    if !shadowed.is_empty() {
        println!(
            "Manual shortcuts take precedence over: /{}",
            shadowed.join(", /")
        );
    }
    Ok(())
}

/// Expand `text` the way the notepad would.
///
/// With a cursor only the trigger ending there is expanded, as when a
/// delimiter is typed; without one every known trigger is replaced.
pub fn expand_text(text: &str, cursor: Option<usize>, registry: &ShortcutRegistry) -> String {
    match cursor {
        Some(offset) => {
            let mut document = Document::from_text(text);
            document.set_caret(Caret::new(NodeId(0), offset));
            let outcome = expand_exact(&mut document, registry);
            tracing::debug!(?outcome, "expanded at cursor");
            document.text()
        }
        None => expand_all(text, registry),
    }
}

#[derive(Serialize)]
struct ExportedShortcut<'a> {
    trigger: &'a str,
    content: &'a str,
    origin: &'static str,
}

pub fn export_json(registry: &ShortcutRegistry) -> Result<String> {
    let exported: Vec<_> = registry
        .entries()
        .iter()
        .map(|entry| ExportedShortcut {
            trigger: &entry.shortcut.trigger,
            content: &entry.shortcut.content,
            origin: entry.origin.label(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&exported)?)
}

fn handle_settings(action: SettingsCommand) -> Result<()> {
    let mut settings = Settings::load_default()?;
    match action {
        SettingsCommand::Show => {
            let rows = settings.accounting_data.lines().filter(|l| !l.trim().is_empty());
            println!("Accounting data:   {} rows", rows.count());
            println!("Bridge URL:        {}", settings.bridge_url());
            println!("API id:            {}", or_unset(&settings.telegram_api_id));
            println!(
                "API hash:          {}",
                if settings.telegram_api_hash.trim().is_empty() {
                    "(not set)"
                } else {
                    "********"
                }
            );
            println!("Phone:             {}", or_unset(&settings.telegram_phone_number));
            println!("Verification chat: {}", or_unset(&settings.verification_chat_id));
            for contact in &settings.contacts {
                println!("Contact:           {} ({})", contact.name, contact.chat_id);
            }
            return Ok(());
        }
        SettingsCommand::Bridge {
            api_id,
            api_hash,
            phone,
            url,
            verification_chat,
        } => {
            let fields = [
                (api_id, &mut settings.telegram_api_id),
                (api_hash, &mut settings.telegram_api_hash),
                (phone, &mut settings.telegram_phone_number),
                (url, &mut settings.telegram_bridge_url),
                (verification_chat, &mut settings.verification_chat_id),
            ];
            for (value, field) in fields {
                if let Some(value) = value {
                    *field = value.trim().to_string();
                }
            }
        }
        SettingsCommand::AddContact { name, chat_id } => {
            if !settings.add_contact(&name, &chat_id) {
                return Err(GlassnoteError::InvalidConfig(
                    "contact name and chat id must not be empty".to_string(),
                ));
            }
        }
        SettingsCommand::RemoveContact { name } => settings.remove_contact(&name),
    }
    settings.save_default()?;
    println!("Settings saved");
    Ok(())
}

fn or_unset(value: &str) -> &str {
    if value.trim().is_empty() {
        "(not set)"
    } else {
        value
    }
}

fn handle_notes() -> Result<()> {
    let notebook = Notebook::load_default();
    for note in notebook.notes() {
        let marker = if note.id == notebook.active_id() { "*" } else { " " };
        let first_line = note.content.lines().next().unwrap_or_default();
        println!(
            "{} {}  ({} chars)  {}",
            marker,
            note.title,
            note.content.chars().count(),
            first_line
        );
    }
    Ok(())
}

fn handle_bridge(action: BridgeCommand) -> Result<()> {
    let settings = Settings::load_default()?;
    let credentials = Credentials::from_settings(&settings)?;
    let client = BridgeClient::from_settings(&settings)?;

    // One runtime per bridge command
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match action {
        BridgeCommand::Login => match runtime.block_on(client.login(&credentials))? {
            LoginOutcome::Authorized => println!("Already connected"),
            LoginOutcome::CodeSent => {
                println!("Code sent to your messaging app.");
                println!("Finish with: glassnote bridge submit-code <code>");
            }
        },
        BridgeCommand::SubmitCode { code } => {
            runtime.block_on(client.submit_code(&credentials.phone, &code))?;
            println!("Successfully connected");
        }
        BridgeCommand::Send {
            text,
            to,
            chat,
            verify,
        } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buffer = String::new();
                    io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            let target = message_target(&settings, to, chat, verify)?;
            let (message, chat_id) = compose_message(&text, &target, &settings)?;
            runtime.block_on(client.send(&credentials, &message, chat_id.as_deref()))?;
            println!("Message sent");
        }
    }
    Ok(())
}

fn message_target(
    settings: &Settings,
    to: Option<String>,
    chat: Option<String>,
    verify: bool,
) -> Result<MessageTarget> {
    if verify {
        return Ok(MessageTarget::Verification);
    }
    if let Some(name) = to {
        let contact = settings.contact(&name).ok_or_else(|| {
            GlassnoteError::InvalidConfig(format!("no saved contact named '{}'", name))
        })?;
        return Ok(MessageTarget::Chat(contact.chat_id.clone()));
    }
    Ok(chat.map_or(MessageTarget::Default, MessageTarget::Chat))
}
