//! Async HTTP client for the bridge endpoints.

use crate::api::{BridgeResponse, LoginOutcome, LoginRequest, SendRequest, SubmitCodeRequest};
use glassnote_core::{GlassnoteError, Result, Settings};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const VERIFICATION_SUFFIX: &str = "\n\nVERIFICACAO";

/// Account credentials the bridge needs for every authenticated call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_id: String,
    pub api_hash: String,
    pub phone: String,
}

impl Credentials {
    /// Take the credentials from settings, rejecting blank fields.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        if !settings.has_bridge_credentials() {
            return Err(GlassnoteError::InvalidConfig(
                "API id, API hash and phone number must be set (glassnote settings bridge ...)"
                    .to_string(),
            ));
        }
        Ok(Self {
            api_id: settings.telegram_api_id.trim().to_string(),
            api_hash: settings.telegram_api_hash.trim().to_string(),
            phone: settings.telegram_phone_number.trim().to_string(),
        })
    }
}

/// Where a message goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageTarget {
    /// The bridge's own default chat.
    Default,
    /// A saved contact or an explicit chat id.
    Chat(String),
    /// The verification chat from settings; the text gets a marker line.
    Verification,
}

/// Prepare selected text for sending.
///
/// The text is trimmed and must not be empty. Verification messages get
/// the marker appended and are routed to the configured verification chat.
pub fn compose_message(
    selected: &str,
    target: &MessageTarget,
    settings: &Settings,
) -> Result<(String, Option<String>)> {
    let text = selected.trim();
    if text.is_empty() {
        return Err(GlassnoteError::Other(
            "Please select some text to send".to_string(),
        ));
    }

    match target {
        MessageTarget::Default => Ok((text.to_string(), None)),
        MessageTarget::Chat(chat_id) => Ok((text.to_string(), Some(chat_id.clone()))),
        MessageTarget::Verification => {
            let chat_id = settings.verification_chat_id.trim();
            if chat_id.is_empty() {
                return Err(GlassnoteError::InvalidConfig(
                    "verification chat id is not set".to_string(),
                ));
            }
            Ok((format!("{}{}", text, VERIFICATION_SUFFIX), Some(chat_id.to_string())))
        }
    }
}

/// Bridge client
pub struct BridgeClient {
    http: Client,
    base_url: String,
}

impl BridgeClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| GlassnoteError::Bridge(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.bridge_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Post `text` through the logged-in account.
    pub async fn send(
        &self,
        credentials: &Credentials,
        text: &str,
        chat_id: Option<&str>,
    ) -> Result<()> {
        let request = SendRequest {
            api_id: credentials.api_id.clone(),
            api_hash: credentials.api_hash.clone(),
            phone: credentials.phone.clone(),
            text: text.to_string(),
            chat_id: chat_id.map(str::to_string),
        };
        self.post("send", &request).await?;
        tracing::info!(chat_id = ?chat_id, "message sent through bridge");
        Ok(())
    }

    /// Start a login; the bridge either reports an existing session or
    /// sends a one-time code.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome> {
        let request = LoginRequest {
            api_id: credentials.api_id.clone(),
            api_hash: credentials.api_hash.clone(),
            phone: credentials.phone.clone(),
        };
        let response = self.post("login", &request).await?;
        Ok(LoginOutcome::from_status(response.status.as_deref()))
    }

    pub async fn submit_code(&self, phone: &str, code: &str) -> Result<()> {
        let code = code.trim();
        if code.is_empty() {
            return Err(GlassnoteError::Other("login code is empty".to_string()));
        }
        let request = SubmitCodeRequest {
            phone: phone.to_string(),
            code: code.to_string(),
        };
        self.post("submit_code", &request).await?;
        Ok(())
    }

    async fn post<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<BridgeResponse> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(%url, "calling bridge");

        let response = self.http.post(&url).json(body).send().await.map_err(|e| {
            GlassnoteError::Bridge(format!(
                "failed to connect to bridge at {}: {}",
                self.base_url, e
            ))
        })?;

        let status = response.status();
        let body: BridgeResponse = response.json().await.map_err(|e| {
            GlassnoteError::Bridge(format!("unreadable bridge response ({}): {}", status, e))
        })?;

        if body.success {
            Ok(body)
        } else {
            tracing::warn!(%url, %status, error = %body.error_message(), "bridge call failed");
            Err(GlassnoteError::Bridge(body.error_message()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            telegram_api_id: " 123 ".into(),
            telegram_api_hash: "abc".into(),
            telegram_phone_number: "+5511".into(),
            verification_chat_id: "-4526".into(),
            ..Settings::default()
        }
    }

    #[test]
    fn credentials_are_trimmed_and_required() {
        let credentials = Credentials::from_settings(&settings()).unwrap();
        assert_eq!(credentials.api_id, "123");

        let missing = Settings::default();
        assert!(matches!(
            Credentials::from_settings(&missing),
            Err(GlassnoteError::InvalidConfig(_))
        ));
    }

    #[test]
    fn compose_trims_and_rejects_empty_text() {
        let settings = settings();
        let (text, chat) = compose_message("  hello \n", &MessageTarget::Default, &settings).unwrap();
        assert_eq!(text, "hello");
        assert_eq!(chat, None);
        assert!(compose_message(" \n ", &MessageTarget::Default, &settings).is_err());
    }

    #[test]
    fn verification_appends_marker_and_uses_its_chat() {
        let (text, chat) =
            compose_message("Pedido 42", &MessageTarget::Verification, &settings()).unwrap();
        assert_eq!(text, "Pedido 42\n\nVERIFICACAO");
        assert_eq!(chat.as_deref(), Some("-4526"));

        assert!(compose_message("x", &MessageTarget::Verification, &Settings::default()).is_err());
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = BridgeClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }
}
