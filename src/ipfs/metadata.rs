//! NFT metadata document pinned alongside an asset.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/ipfs/metadata`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRequest {
    pub ip_hash: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub is_encrypted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub properties: AssetProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetProperties {
    pub ip_hash: String,
    pub name: String,
    pub description: String,
    pub is_encrypted: bool,
    pub upload_date: String,
}

impl AssetMetadata {
    pub fn build(request: &MetadataRequest, now: DateTime<Utc>) -> Self {
        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("IP Asset #{}", now.timestamp_millis()));
        let description = request
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or("No description provided")
            .to_string();
        let ip_hash = request.ip_hash.clone().unwrap_or_default();

        Self {
            name: name.clone(),
            description: description.clone(),
            image: ip_hash.clone(),
            properties: AssetProperties {
                ip_hash,
                name,
                description,
                is_encrypted: request.is_encrypted,
                upload_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_defaults() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let doc = AssetMetadata::build(
            &MetadataRequest {
                ip_hash: Some("ipfs://QmFile".into()),
                ..Default::default()
            },
            now,
        );

        assert_eq!(doc.name, "IP Asset #1700000000123");
        assert_eq!(doc.description, "No description provided");
        assert_eq!(doc.image, "ipfs://QmFile");
        assert_eq!(doc.properties.upload_date, "2023-11-14T22:13:20.123Z");
    }

    #[test]
    fn test_wire_shape() {
        let doc = AssetMetadata::build(
            &MetadataRequest {
                ip_hash: Some("ipfs://QmFile".into()),
                name: Some("Song".into()),
                description: Some("A song".into()),
                is_encrypted: true,
            },
            Utc::now(),
        );
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["properties"]["ipHash"], "ipfs://QmFile");
        assert_eq!(json["properties"]["isEncrypted"], true);
        assert_eq!(json["properties"]["name"], "Song");
        assert!(json["properties"]["uploadDate"].is_string());
    }
}
