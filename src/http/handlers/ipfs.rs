//! IPFS uploads through Pinata.

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::http::request::json_body;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::ipfs::{gateway_url, ipfs_uri, AssetMetadata, MetadataRequest, Upload};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedResponse {
    pub success: bool,
    pub cid: String,
    pub ipfs_url: String,
    pub gateway_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AssetMetadata>,
}

impl PinnedResponse {
    fn new(cid: String, gateway: &str) -> Self {
        let ipfs_url = ipfs_uri(&cid);
        Self {
            success: true,
            gateway_url: gateway_url(gateway, &ipfs_url),
            ipfs_url,
            cid,
            metadata: None,
        }
    }
}

pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PinnedResponse>, ApiError> {
    let pinata = state.pinata()?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;
        upload = Some(Upload::new(file_name, content_type.as_deref(), bytes.to_vec()));
        break;
    }

    let upload = upload.ok_or_else(|| ApiError::bad_request("Missing required field: file"))?;
    if upload.bytes.is_empty() {
        return Err(ApiError::bad_request("Uploaded file is empty"));
    }

    let cid = pinata.pin_file(upload).await.map_err(ApiError::pinata)?;
    Ok(Json(PinnedResponse::new(cid, &state.config.pinata.gateway_url)))
}

pub async fn upload_metadata(
    State(state): State<AppState>,
    body: Result<Json<MetadataRequest>, JsonRejection>,
) -> Result<Json<PinnedResponse>, ApiError> {
    let request = json_body(body)?;
    if request.ip_hash.as_deref().map_or(true, |h| h.trim().is_empty()) {
        return Err(ApiError::bad_request("Missing required parameter: ipHash"));
    }
    let pinata = state.pinata()?;

    let document = AssetMetadata::build(&request, Utc::now());
    let content = serde_json::to_value(&document)
        .map_err(|e| ApiError::internal("Failed to encode metadata", e))?;
    let cid = pinata
        .pin_json(&format!("{}-metadata", document.name), &content)
        .await
        .map_err(ApiError::pinata)?;

    let mut response = PinnedResponse::new(cid, &state.config.pinata.gateway_url);
    response.metadata = Some(document);
    Ok(Json(response))
}
