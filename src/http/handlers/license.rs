//! `POST /api/license/mint` (and `/api/license`).

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blockchain::types::{MintLicenseCall, TxOutcome};
use crate::http::request::{json_body, parse_address, parse_nonzero_uint};
use crate::http::response::ApiError;
use crate::http::server::AppState;

pub const MISSING_PARAMS: &str = "Missing required parameters: tokenId, royaltyPercentage, \
    duration, commercialUse, terms, modredIpContractAddress";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintLicenseRequest {
    pub token_id: Option<Value>,
    pub royalty_percentage: Option<Value>,
    pub duration: Option<Value>,
    pub commercial_use: Option<bool>,
    pub terms: Option<String>,
    pub modred_ip_contract_address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TxResponse {
    pub message: &'static str,
    pub data: TxOutcome,
}

pub async fn mint_license(
    State(state): State<AppState>,
    body: Result<Json<MintLicenseRequest>, JsonRejection>,
) -> Result<Json<TxResponse>, ApiError> {
    let request = json_body(body)?;

    let token_id = parse_nonzero_uint(request.token_id.as_ref());
    let royalty_percentage = parse_nonzero_uint(request.royalty_percentage.as_ref());
    let duration = parse_nonzero_uint(request.duration.as_ref());
    let terms = request.terms.filter(|t| !t.trim().is_empty());
    let contract_raw = request.modred_ip_contract_address.filter(|c| !c.trim().is_empty());

    let (
        Some(token_id),
        Some(royalty_percentage),
        Some(duration),
        Some(commercial_use),
        Some(terms),
        Some(contract_raw),
    ) = (token_id, royalty_percentage, duration, request.commercial_use, terms, contract_raw)
    else {
        return Err(ApiError::bad_request(MISSING_PARAMS));
    };
    let contract = parse_address(&contract_raw)
        .ok_or_else(|| ApiError::bad_request("Invalid contract address"))?;

    let registry = state.registry()?;
    tracing::info!(
        contract = %contract,
        token_id = %token_id,
        royalty_percentage = %royalty_percentage,
        duration = %duration,
        commercial_use,
        "Minting license"
    );

    let outcome = registry
        .mint_license(
            contract,
            MintLicenseCall {
                token_id,
                royalty_percentage,
                duration,
                commercial_use,
                terms,
            },
        )
        .await
        .map_err(|e| ApiError::chain("Failed to mint license on Etherlink", e))?;

    tracing::info!(tx_hash = %outcome.tx_hash, block = outcome.block_number, "License minted");
    Ok(Json(TxResponse {
        message: "License minted successfully on Etherlink",
        data: outcome,
    }))
}
