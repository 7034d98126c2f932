//! Read-only views of on-chain IP assets and licenses.

use std::str::FromStr;

use alloy::primitives::U256;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::blockchain::registry::{list_ip_assets, list_licenses};
use crate::blockchain::types::{IpAsset, License};
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::ipfs::gateway::{gateway_url, is_ipfs_reference};

#[derive(Debug, Default, Deserialize)]
pub struct ContractQuery {
    pub contract: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetView {
    #[serde(flatten)]
    pub asset: IpAsset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_gateway_url: Option<String>,
}

impl AssetView {
    fn new(asset: IpAsset, gateway: &str) -> Self {
        let metadata_gateway_url =
            is_ipfs_reference(&asset.metadata).then(|| gateway_url(gateway, &asset.metadata));
        Self {
            asset,
            metadata_gateway_url,
        }
    }
}

fn parse_id(raw: &str) -> Result<U256, ApiError> {
    U256::from_str(raw.trim())
        .ok()
        .filter(|id| !id.is_zero())
        .ok_or_else(|| ApiError::bad_request(format!("Invalid id: {}", raw)))
}

pub async fn list_assets(
    State(state): State<AppState>,
    Query(query): Query<ContractQuery>,
) -> Result<Json<Vec<AssetView>>, ApiError> {
    let contract = state.contract_or_default(query.contract.as_deref())?;
    let registry = state.registry()?;

    let assets = list_ip_assets(registry, contract)
        .await
        .map_err(|e| ApiError::chain("Failed to read IP assets", e))?;
    let gateway = &state.config.pinata.gateway_url;

    Ok(Json(
        assets
            .into_iter()
            .map(|asset| AssetView::new(asset, gateway))
            .collect(),
    ))
}

pub async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ContractQuery>,
) -> Result<Json<AssetView>, ApiError> {
    let id = parse_id(&id)?;
    let contract = state.contract_or_default(query.contract.as_deref())?;
    let registry = state.registry()?;

    let asset = registry
        .ip_asset(contract, id)
        .await
        .map_err(|e| ApiError::chain("Failed to read IP asset", e))?;

    Ok(Json(AssetView::new(asset, &state.config.pinata.gateway_url)))
}

pub async fn list_all_licenses(
    State(state): State<AppState>,
    Query(query): Query<ContractQuery>,
) -> Result<Json<Vec<License>>, ApiError> {
    let contract = state.contract_or_default(query.contract.as_deref())?;
    let registry = state.registry()?;

    let licenses = list_licenses(registry, contract)
        .await
        .map_err(|e| ApiError::chain("Failed to read licenses", e))?;
    Ok(Json(licenses))
}

pub async fn get_license(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ContractQuery>,
) -> Result<Json<License>, ApiError> {
    let id = parse_id(&id)?;
    let contract = state.contract_or_default(query.contract.as_deref())?;
    let registry = state.registry()?;

    let license = registry
        .license(contract, id)
        .await
        .map_err(|e| ApiError::chain("Failed to read license", e))?;
    Ok(Json(license))
}
