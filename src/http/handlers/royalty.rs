//! Royalty payment and claiming.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::license::TxResponse;
use crate::http::request::{json_body, parse_address, parse_ether_amount, parse_nonzero_uint};
use crate::http::response::ApiError;
use crate::http::server::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayRoyaltyRequest {
    pub token_id: Option<Value>,
    /// Ether, as a decimal string.
    pub amount: Option<Value>,
    pub modred_ip_contract_address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRoyaltyRequest {
    pub token_id: Option<Value>,
    pub modred_ip_contract_address: Option<String>,
}

fn contract_param(raw: Option<String>) -> Result<alloy::primitives::Address, ApiError> {
    let raw = raw.filter(|c| !c.trim().is_empty()).ok_or_else(|| {
        ApiError::bad_request("Missing required parameter: modredIpContractAddress")
    })?;
    parse_address(&raw).ok_or_else(|| ApiError::bad_request("Invalid contract address"))
}

pub async fn pay_royalty(
    State(state): State<AppState>,
    body: Result<Json<PayRoyaltyRequest>, JsonRejection>,
) -> Result<Json<TxResponse>, ApiError> {
    let request = json_body(body)?;

    let (Some(token_id), Some(amount)) = (
        parse_nonzero_uint(request.token_id.as_ref()),
        request.amount,
    ) else {
        return Err(ApiError::bad_request(
            "Missing required parameters: tokenId, amount, modredIpContractAddress",
        ));
    };
    let value = parse_ether_amount(&amount)
        .ok_or_else(|| ApiError::bad_request("amount must be a positive ether value"))?;
    let contract = contract_param(request.modred_ip_contract_address)?;

    let registry = state.registry()?;
    tracing::info!(contract = %contract, token_id = %token_id, wei = %value, "Paying revenue");

    let outcome = registry
        .pay_revenue(contract, token_id, value)
        .await
        .map_err(|e| ApiError::chain("Failed to pay revenue", e))?;

    Ok(Json(TxResponse {
        message: "Revenue paid successfully",
        data: outcome,
    }))
}

pub async fn claim_royalties(
    State(state): State<AppState>,
    body: Result<Json<ClaimRoyaltyRequest>, JsonRejection>,
) -> Result<Json<TxResponse>, ApiError> {
    let request = json_body(body)?;

    let token_id = parse_nonzero_uint(request.token_id.as_ref()).ok_or_else(|| {
        ApiError::bad_request("Missing required parameters: tokenId, modredIpContractAddress")
    })?;
    let contract = contract_param(request.modred_ip_contract_address)?;

    let registry = state.registry()?;
    tracing::info!(contract = %contract, token_id = %token_id, "Claiming royalties");

    let outcome = registry
        .claim_royalties(contract, token_id)
        .await
        .map_err(|e| ApiError::chain("Failed to claim royalties", e))?;

    Ok(Json(TxResponse {
        message: "Royalties claimed successfully",
        data: outcome,
    }))
}
