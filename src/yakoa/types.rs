//! Yakoa wire types and errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors from the Yakoa API.
#[derive(Debug, Error)]
pub enum YakoaError {
    /// No response (DNS, connect, timeout, TLS).
    #[error("Yakoa unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// Yakoa answered with a non-success status.
    #[error("Yakoa API error: {status}")]
    Api { status: u16, body: Value },

    #[error("Yakoa token {0} not found")]
    NotFound(String),

    #[error("Yakoa API key not configured")]
    NotConfigured,
}

/// Body of `POST /token`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRegistration {
    pub id: String,
    pub registration_tx: RegistrationTx,
    pub creator_id: String,
    pub metadata: TokenMetadata,
    pub media: Vec<MediaItem>,
    pub license_parents: Vec<LicenseParent>,
    pub token_authorizations: Vec<Authorization>,
    pub creator_authorizations: Vec<Authorization>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationTx {
    pub hash: String,
    pub block_number: u64,
    pub timestamp: String,
}

/// Descriptive metadata attached to a token for infringement matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub title: String,
    pub description: String,
    pub creator: String,
    pub created_at: String,
    pub ip_hash: String,
    pub is_encrypted: bool,
    pub contract_address: String,
    pub token_id: String,
    pub content_type: String,
    pub file_size: u64,
    pub mime_type: String,
    pub tags: Vec<String>,
    pub category: String,
    pub license_type: String,
    pub commercial_use: bool,
    pub derivatives_allowed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub media_id: String,
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub size: u64,
    pub metadata: MediaMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub name: String,
    pub description: String,
    pub creator: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseParent {
    pub parent_id: String,
    pub license_id: String,
}

/// Who may act on behalf of a token or creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    pub brand_id: Option<String>,
    pub brand_name: Option<String>,
    pub data: Option<AuthorizationData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthorizationData {
    Email { email_address: String },
}

/// Answer of the browser-facing registration proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyRegistrationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub const DEFAULT_REGISTRATION_STATUS: &str = "registered";
pub const DEFAULT_REGISTRATION_DETAILS: &str = "IP asset successfully registered with Yakoa";

impl ProxyRegistrationResponse {
    /// Success answer from a Yakoa 2xx body, filling defaults.
    pub fn from_yakoa_body(body: &Value) -> Self {
        let registration_status = body
            .get("registration_status")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_REGISTRATION_STATUS)
            .to_string();
        let details = match body.get("details") {
            Some(v) if !v.is_null() && v.as_str() != Some("") => v.clone(),
            _ => Value::String(DEFAULT_REGISTRATION_DETAILS.to_string()),
        };

        Self {
            success: true,
            token_id: body.get("token_id").cloned(),
            registration_status: Some(registration_status),
            details: Some(details),
            error: None,
        }
    }

    /// Failure answer carrying Yakoa's status and body.
    pub fn api_error(status: u16, body: Value) -> Self {
        Self {
            success: false,
            token_id: None,
            registration_status: None,
            details: Some(body),
            error: Some(format!("Yakoa API error: {}", status)),
        }
    }
}

/// Infringement summary derived from a Yakoa token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfringementStatus {
    pub id: Value,
    pub status: String,
    pub result: String,
    pub in_network_infringements: Vec<Value>,
    pub external_infringements: Vec<Value>,
    pub credits: Value,
    pub last_checked: Value,
    pub total_infringements: usize,
}

impl InfringementStatus {
    /// Summarize the `infringements` block of a token, defaulting missing parts.
    pub fn from_token(token: &Value) -> Self {
        let infringements = token.get("infringements");
        let field = |key: &str| infringements.and_then(|i| i.get(key)).filter(|v| !v.is_null());
        let text = |key: &str| {
            field(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or("unknown")
                .to_string()
        };
        let list = |key: &str| {
            field(key)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default()
        };

        let in_network = list("in_network_infringements");
        let external = list("external_infringements");

        Self {
            id: token.get("id").cloned().unwrap_or(Value::Null),
            status: text("status"),
            result: text("result"),
            total_infringements: in_network.len() + external.len(),
            in_network_infringements: in_network,
            external_infringements: external,
            credits: field("credits").cloned().unwrap_or_else(|| Value::Object(Default::default())),
            last_checked: field("last_checked").cloned().unwrap_or(Value::Null),
        }
    }
}
