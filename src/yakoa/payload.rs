//! Builds the Yakoa token registration body from an on-chain registration.

use alloy::primitives::{Address, TxHash, U256};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use super::ids;
use super::types::{
    Authorization, AuthorizationData, MediaItem, MediaMetadata, RegistrationTx, TokenMetadata,
    TokenRegistration,
};

const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";
const PUBLIC_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs";

/// A confirmed `registerIP` call, as the registration route sees it.
#[derive(Debug, Clone)]
pub struct RegisteredAsset<'a> {
    pub contract: Address,
    pub ip_asset_id: U256,
    pub ip_hash: &'a str,
    pub metadata: &'a str,
    pub is_encrypted: bool,
    pub tx_hash: TxHash,
    pub block_number: u64,
}

/// Drop a leading `ipfs://`.
pub fn strip_ipfs_prefix(hash: &str) -> &str {
    hash.strip_prefix("ipfs://").unwrap_or(hash)
}

/// Creator id for Yakoa: the metadata creator when it is an address, else the zero address.
pub fn creator_id(creator: Option<&str>) -> String {
    match creator {
        Some(c) if ids::is_address(c) => c.to_lowercase(),
        _ => ZERO_ADDRESS.to_string(),
    }
}

fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parsed asset metadata. Unparseable strings become a placeholder document.
fn parse_metadata(raw: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        _ => {
            let mut map = Map::new();
            map.insert("name".into(), Value::from("Unknown"));
            map.insert("description".into(), Value::from(""));
            map.insert("creator".into(), Value::from("unknown"));
            map
        }
    }
}

fn text<'m>(meta: &'m Map<String, Value>, key: &str) -> Option<&'m str> {
    meta.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn flag(meta: &Map<String, Value>, key: &str) -> bool {
    meta.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn size(meta: &Map<String, Value>, key: &str) -> u64 {
    match meta.get(key) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

/// Build the `POST /token` body for a freshly registered asset.
pub fn build_registration(
    asset: &RegisteredAsset<'_>,
    default_email: &str,
    now: DateTime<Utc>,
) -> TokenRegistration {
    let meta = parse_metadata(asset.metadata);
    let now = iso(now);

    let contract = asset.contract.to_string().to_lowercase();
    let token_id = ids::token_id(&contract, asset.ip_asset_id);
    let hash = strip_ipfs_prefix(asset.ip_hash);

    let title = text(&meta, "name").unwrap_or("Unknown").to_string();
    let description = text(&meta, "description").unwrap_or("").to_string();
    let creator = creator_id(text(&meta, "creator"));
    let created_at = text(&meta, "created_at").map(str::to_string).unwrap_or_else(|| now.clone());
    let mime_type = text(&meta, "mime_type").unwrap_or("unknown").to_string();
    let file_size = size(&meta, "file_size");

    let tags = meta
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let email = text(&meta, "creator_email").unwrap_or(default_email).to_string();
    let authorizations = vec![Authorization {
        brand_id: None,
        brand_name: None,
        data: Some(AuthorizationData::Email { email_address: email }),
    }];

    let media = vec![MediaItem {
        media_id: title.clone(),
        url: format!("{}/{}", PUBLIC_IPFS_GATEWAY, hash),
        media_type: mime_type.clone(),
        size: file_size,
        metadata: MediaMetadata {
            name: title.clone(),
            description: description.clone(),
            creator: creator.clone(),
            created_at: created_at.clone(),
        },
    }];

    TokenRegistration {
        id: ids::base_id(&token_id),
        registration_tx: RegistrationTx {
            hash: asset.tx_hash.to_string().to_lowercase(),
            block_number: asset.block_number,
            timestamp: now,
        },
        creator_id: creator.clone(),
        metadata: TokenMetadata {
            title,
            description,
            creator,
            created_at,
            ip_hash: hash.to_string(),
            is_encrypted: asset.is_encrypted,
            contract_address: contract,
            token_id: asset.ip_asset_id.to_string(),
            content_type: text(&meta, "content_type").unwrap_or("unknown").to_string(),
            file_size,
            mime_type,
            tags,
            category: text(&meta, "category").unwrap_or("general").to_string(),
            license_type: text(&meta, "license_type")
                .unwrap_or("all_rights_reserved")
                .to_string(),
            commercial_use: flag(&meta, "commercial_use"),
            derivatives_allowed: flag(&meta, "derivatives_allowed"),
        },
        media,
        license_parents: Vec::new(),
        token_authorizations: authorizations.clone(),
        creator_authorizations: authorizations,
    }
}
