//! Request and response bodies for the bridge endpoints.

use serde::{Deserialize, Serialize};

/// Body of `POST /send`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub api_id: String,
    pub api_hash: String,
    pub phone: String,
    pub text: String,
    /// Chat to deliver to; the bridge uses its own default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
}

/// Body of `POST /login`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub api_id: String,
    pub api_hash: String,
    pub phone: String,
}

/// Body of `POST /submit_code`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SubmitCodeRequest {
    pub phone: String,
    pub code: String,
}

/// Every endpoint answers with this shape, whatever the HTTP status.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl BridgeResponse {
    /// The bridge's explanation of a failure
    pub fn error_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

/// What a successful login request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The session was already authorized.
    Authorized,
    /// A one-time code was sent to the account; follow up with
    /// `submit_code`.
    CodeSent,
}

impl LoginOutcome {
    pub fn from_status(status: Option<&str>) -> Self {
        match status {
            Some("authorized") => LoginOutcome::Authorized,
            _ => LoginOutcome::CodeSent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_id_is_omitted_when_absent() {
        let request = SendRequest {
            api_id: "1".into(),
            api_hash: "h".into(),
            phone: "+1".into(),
            text: "hi".into(),
            chat_id: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("chat_id").is_none());
        assert_eq!(json["text"], "hi");
    }

    #[test]
    fn response_fields_are_optional() {
        let response: BridgeResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(response.success);
        assert_eq!(response.status, None);

        let failed: BridgeResponse = serde_json::from_str(r#"{"error":"Missing params"}"#).unwrap();
        assert!(!failed.success);
        assert_eq!(failed.error_message(), "Missing params");
    }

    #[test]
    fn login_status_maps_to_outcome() {
        assert_eq!(LoginOutcome::from_status(Some("authorized")), LoginOutcome::Authorized);
        assert_eq!(LoginOutcome::from_status(Some("code_sent")), LoginOutcome::CodeSent);
        assert_eq!(LoginOutcome::from_status(None), LoginOutcome::CodeSent);
    }
}
