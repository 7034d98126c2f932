//! `POST /api/register`: register on-chain, then with Yakoa.

use alloy::primitives::{TxHash, U256};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::blockchain::types::{decimal, RegisterIpCall};
use crate::http::request::{json_body, parse_address};
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::yakoa::payload::{build_registration, RegisteredAsset};

pub const MISSING_PARAMS: &str =
    "Missing required parameters: ipHash, metadata, isEncrypted, modredIpContractAddress";

const REGISTERED: &str = "IP Asset successfully registered on Etherlink and Yakoa";
const ALREADY_IN_YAKOA: &str = "IP Asset registered on Etherlink, already exists in Yakoa";
const ID_NOT_EXTRACTED: &str = "Registration successful (IP Asset ID not extracted)";
const YAKOA_SKIPPED: &str = "IP Asset registered on Etherlink (Yakoa not configured)";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub ip_hash: Option<String>,
    /// A string, or an object that is stored as its JSON text.
    pub metadata: Option<Value>,
    pub is_encrypted: Option<bool>,
    pub modred_ip_contract_address: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EtherlinkRegistration<'a> {
    tx_hash: TxHash,
    #[serde(with = "decimal::option")]
    ip_asset_id: Option<U256>,
    explorer_url: &'a str,
    #[serde(with = "decimal")]
    block_number: u64,
    ip_hash: &'a str,
}

fn metadata_text(metadata: Option<Value>) -> Option<String> {
    match metadata? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Object(map) if !map.is_empty() => Some(Value::Object(map).to_string()),
        _ => None,
    }
}

pub async fn register_ip(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = json_body(body)?;

    let ip_hash = request.ip_hash.filter(|h| !h.trim().is_empty());
    let metadata = metadata_text(request.metadata);
    let contract_raw = request.modred_ip_contract_address.filter(|c| !c.trim().is_empty());
    let (Some(ip_hash), Some(metadata), Some(is_encrypted), Some(contract_raw)) =
        (ip_hash, metadata, request.is_encrypted, contract_raw)
    else {
        return Err(ApiError::bad_request(MISSING_PARAMS));
    };
    let contract = parse_address(&contract_raw)
        .ok_or_else(|| ApiError::bad_request("Invalid contract address"))?;

    let registry = state.registry()?;
    tracing::info!(contract = %contract, ip_hash = %ip_hash, is_encrypted, "Registering IP asset");

    let registration = registry
        .register_ip(
            contract,
            RegisterIpCall {
                ip_hash: ip_hash.clone(),
                metadata: metadata.clone(),
                is_encrypted,
            },
        )
        .await
        .map_err(|e| ApiError::chain("Registration failed", e))?;

    let tx = &registration.tx;
    let ip_asset_id = registration.ip_asset_id.filter(|id| !id.is_zero());
    tracing::info!(
        tx_hash = %tx.tx_hash,
        ip_asset_id = ?ip_asset_id,
        block = tx.block_number,
        "IP asset registered on Etherlink"
    );

    let etherlink = EtherlinkRegistration {
        tx_hash: tx.tx_hash,
        ip_asset_id,
        explorer_url: &tx.explorer_url,
        block_number: tx.block_number,
        ip_hash: &ip_hash,
    };

    let Some(ip_asset_id) = ip_asset_id else {
        tracing::warn!(tx_hash = %tx.tx_hash, "No Transfer event in receipt, skipping Yakoa");
        let body = json!({ "message": ID_NOT_EXTRACTED, "etherlink": etherlink });
        return Ok(Json(body).into_response());
    };

    if !state.yakoa.is_configured() {
        tracing::warn!("YAKOA_API_KEY not set, skipping Yakoa registration");
        return Ok(Json(json!({ "message": YAKOA_SKIPPED, "etherlink": etherlink, "yakoa": null }))
            .into_response());
    }

    let payload = build_registration(
        &RegisteredAsset {
            contract,
            ip_asset_id,
            ip_hash: &ip_hash,
            metadata: &metadata,
            is_encrypted,
            tx_hash: tx.tx_hash,
            block_number: tx.block_number,
        },
        &state.config.yakoa.default_creator_email,
        Utc::now(),
    );

    match state.yakoa.register_token(&payload).await {
        Ok(yakoa) => {
            let message = if yakoa.get("alreadyRegistered") == Some(&Value::Bool(true)) {
                ALREADY_IN_YAKOA
            } else {
                REGISTERED
            };
            let body = json!({ "message": message, "etherlink": etherlink, "yakoa": yakoa });
            Ok(Json(body).into_response())
        }
        Err(e) => {
            // The asset is on-chain already; the caller still needs the receipt.
            tracing::error!(
                token = %payload.id,
                error = %e,
                "Yakoa registration failed after on-chain registration"
            );
            let details = match &e {
                crate::yakoa::YakoaError::Api { body, .. } => body.clone(),
                other => Value::String(other.to_string()),
            };
            Ok((
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "error": "Yakoa registration failed",
                    "details": details,
                    "etherlink": etherlink,
                })),
            )
                .into_response())
        }
    }
}
