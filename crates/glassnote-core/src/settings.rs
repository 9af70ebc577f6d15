//! User settings that feed the shortcut registry and the bridge.

use crate::config::{get_settings_file_path, DEFAULT_BRIDGE_URL};
use crate::error::Result;
use crate::storage::{read_json, write_json};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A named chat the bridge can deliver to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub name: String,
    pub chat_id: String,
}

/// Persisted settings. Fields missing on disk take their default value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Tab-separated rows pasted from a spreadsheet; source of the
    /// generated `/email_*` shortcuts.
    pub accounting_data: String,
    pub telegram_api_id: String,
    pub telegram_api_hash: String,
    pub telegram_phone_number: String,
    pub telegram_bridge_url: String,
    pub verification_chat_id: String,
    pub contacts: Vec<Contact>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            accounting_data: String::new(),
            telegram_api_id: String::new(),
            telegram_api_hash: String::new(),
            telegram_phone_number: String::new(),
            telegram_bridge_url: DEFAULT_BRIDGE_URL.to_string(),
            verification_chat_id: String::new(),
            contacts: Vec::new(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(read_json(path)?.unwrap_or_default())
    }

    pub fn load_default() -> Result<Self> {
        Self::load(&get_settings_file_path())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }

    pub fn save_default(&self) -> Result<()> {
        self.save(&get_settings_file_path())
    }

    /// The bridge URL, falling back to the default when blank
    pub fn bridge_url(&self) -> &str {
        let url = self.telegram_bridge_url.trim();
        if url.is_empty() {
            DEFAULT_BRIDGE_URL
        } else {
            url
        }
    }

    /// Whether API id, hash and phone are all filled in
    pub fn has_bridge_credentials(&self) -> bool {
        [
            &self.telegram_api_id,
            &self.telegram_api_hash,
            &self.telegram_phone_number,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }

    pub fn contact(&self, name: &str) -> Option<&Contact> {
        self.contacts
            .iter()
            .find(|contact| contact.name.eq_ignore_ascii_case(name))
    }

    pub fn add_contact(&mut self, name: &str, chat_id: &str) -> bool {
        let (name, chat_id) = (name.trim(), chat_id.trim());
        if name.is_empty() || chat_id.is_empty() {
            return false;
        }
        self.contacts.push(Contact {
            name: name.to_string(),
            chat_id: chat_id.to_string(),
        });
        true
    }

    pub fn remove_contact(&mut self, name: &str) {
        self.contacts
            .retain(|contact| !contact.name.eq_ignore_ascii_case(name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"accountingData":"Acme\ta@acme.com","fontSize":"18px"}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.accounting_data, "Acme\ta@acme.com");
        assert_eq!(settings.bridge_url(), DEFAULT_BRIDGE_URL);
        assert!(settings.contacts.is_empty());
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn blank_bridge_url_falls_back() {
        let settings = Settings {
            telegram_bridge_url: "  ".into(),
            ..Settings::default()
        };
        assert_eq!(settings.bridge_url(), DEFAULT_BRIDGE_URL);
    }

    #[test]
    fn credentials_need_every_field() {
        let mut settings = Settings {
            telegram_api_id: "123".into(),
            telegram_api_hash: "abc".into(),
            ..Settings::default()
        };
        assert!(!settings.has_bridge_credentials());
        settings.telegram_phone_number = "+5511999999999".into();
        assert!(settings.has_bridge_credentials());
    }

    #[test]
    fn contacts_are_matched_by_name() {
        let mut settings = Settings::default();
        assert!(settings.add_contact(" Finance ", "-100123"));
        assert!(!settings.add_contact("", "-1"));
        assert_eq!(settings.contact("finance").unwrap().chat_id, "-100123");
        settings.remove_contact("FINANCE");
        assert!(settings.contacts.is_empty());
    }

    #[test]
    fn saved_settings_load_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = Settings::default();
        settings.verification_chat_id = "-4526".into();
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }
}
