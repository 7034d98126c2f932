//! Pinata pinning client.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::{PinataConfig, TimeoutConfig};

#[derive(Debug, Error)]
pub enum PinataError {
    #[error("Pinata unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Pinata upload failed: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Pinata JWT is not configured")]
    NotConfigured,
}

/// A file handed to [`PinataClient::pin_file`].
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A missing or malformed content type becomes `application/octet-stream`.
fn content_type_or_default(content_type: Option<&str>) -> mime::Mime {
    content_type
        .and_then(|ct| ct.trim().parse::<mime::Mime>().ok())
        .unwrap_or(mime::APPLICATION_OCTET_STREAM)
}

impl Upload {
    pub fn new(file_name: impl Into<String>, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type_or_default(content_type).to_string(),
            bytes,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

#[derive(Clone)]
pub struct PinataClient {
    http: reqwest::Client,
    api_url: String,
    jwt: String,
}

impl std::fmt::Debug for PinataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinataClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl PinataClient {
    /// `None` when no JWT is configured.
    pub fn from_config(
        config: &PinataConfig,
        timeouts: &TimeoutConfig,
    ) -> Result<Option<Self>, PinataError> {
        if config.jwt.trim().is_empty() {
            return Ok(None);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .build()?;

        Ok(Some(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            jwt: config.jwt.trim().to_string(),
        }))
    }

    async fn pin(&self, request: reqwest::RequestBuilder) -> Result<String, PinataError> {
        let response = request.bearer_auth(&self.jwt).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "Pinata rejected pin request");
            return Err(PinataError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let pinned: PinResponse = response.json().await?;
        Ok(pinned.ipfs_hash)
    }

    /// Pin a file and return its CID.
    pub async fn pin_file(&self, upload: Upload) -> Result<String, PinataError> {
        let size = upload.bytes.len();
        let content_type = content_type_or_default(Some(&upload.content_type)).to_string();
        let pinata_metadata = json!({
            "name": upload.file_name,
            "description": "Uploaded via ModredIP",
            "keyvalues": {
                "uploadedBy": "ModredIP",
                "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                "fileType": &content_type,
                "fileSize": size,
            }
        });

        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name.clone())
            .mime_str(&content_type)?;
        let form = Form::new()
            .part("file", part)
            .text("pinataMetadata", pinata_metadata.to_string());

        let cid = self
            .pin(
                self.http
                    .post(format!("{}/pinning/pinFileToIPFS", self.api_url))
                    .multipart(form),
            )
            .await?;
        tracing::info!(cid = %cid, file = %upload.file_name, size, "File pinned to IPFS");
        Ok(cid)
    }

    /// Pin a JSON document and return its CID.
    pub async fn pin_json(&self, name: &str, content: &Value) -> Result<String, PinataError> {
        let body = json!({
            "pinataContent": content,
            "pinataMetadata": { "name": name },
        });

        let cid = self
            .pin(
                self.http
                    .post(format!("{}/pinning/pinJSONToIPFS", self.api_url))
                    .json(&body),
            )
            .await?;
        tracing::info!(cid = %cid, name, "JSON pinned to IPFS");
        Ok(cid)
    }
}
