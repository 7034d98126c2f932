//! Development stand-in for Yakoa registrations.

use serde_json::Value;

use super::types::{ProxyRegistrationResponse, DEFAULT_REGISTRATION_STATUS};

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `yakoa_{millis}_{7 base-36 chars}`.
pub fn mock_token_id(now_millis: i64) -> String {
    let suffix: String = (0..7)
        .map(|_| BASE36[fastrand::usize(..BASE36.len())] as char)
        .collect();
    format!("yakoa_{}_{}", now_millis, suffix)
}

/// Pretend registration answer for a proxied body. The asset name is read
/// from `metadata.name` (or `metadata.title`).
pub fn mock_registration(body: &Value, now_millis: i64) -> ProxyRegistrationResponse {
    let name = body
        .get("metadata")
        .and_then(|m| m.get("name").or_else(|| m.get("title")))
        .and_then(Value::as_str)
        .unwrap_or("Unknown");

    ProxyRegistrationResponse {
        success: true,
        token_id: Some(Value::String(mock_token_id(now_millis))),
        registration_status: Some(DEFAULT_REGISTRATION_STATUS.to_string()),
        details: Some(Value::String(format!(
            "IP asset \"{}\" registered with Yakoa for copyright monitoring. \
             This is a mock response: Yakoa was unreachable.",
            name
        ))),
        error: None,
    }
}
