//! Yakoa proxy and infringement lookups.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::http::request::json_body;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics::record_yakoa_call;
use crate::yakoa::{ids, mock, InfringementStatus, ProxyRegistrationResponse, YakoaError};

/// Forward a browser-built registration to Yakoa with the server's API key.
pub async fn proxy_registration(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let body = match json_body(body) {
        Ok(body) => body,
        Err(e) => return e.into_response(),
    };

    match state.yakoa.forward_registration(&body).await {
        Ok(reply) if reply.status.is_success() => {
            tracing::info!(status = reply.status.as_u16(), "Yakoa proxy registration accepted");
            Json(ProxyRegistrationResponse::from_yakoa_body(&reply.body)).into_response()
        }
        Ok(reply) => {
            tracing::warn!(
                status = reply.status.as_u16(),
                body = %reply.body,
                "Yakoa proxy registration rejected"
            );
            (
                reply.status,
                Json(ProxyRegistrationResponse::api_error(reply.status.as_u16(), reply.body)),
            )
                .into_response()
        }
        Err(e) if state.config.yakoa.mock_fallback => {
            tracing::warn!(error = %e, "Yakoa unreachable, answering with mock registration");
            record_yakoa_call("proxy", "mock");
            Json(mock::mock_registration(&body, Utc::now().timestamp_millis())).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Yakoa proxy failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Internal server error",
                    "details": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

pub async fn get_token(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let token = state.yakoa.get_token(&id).await.map_err(ApiError::yakoa)?;
    Ok(Json(token))
}

async fn infringement(state: &AppState, id: &str) -> Result<Json<InfringementStatus>, ApiError> {
    match state.yakoa.infringement_status(id).await {
        Ok(status) => Ok(Json(status)),
        Err(YakoaError::NotFound(_)) => Err(ApiError::NotFound(format!(
            "Token {} is not registered with Yakoa",
            ids::base_id(id)
        ))),
        Err(e) => {
            tracing::error!(token = %id, error = %e, "Infringement lookup failed");
            Err(ApiError::yakoa(e))
        }
    }
}

pub async fn infringement_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InfringementStatus>, ApiError> {
    infringement(&state, &id).await
}

pub async fn infringement_by_contract(
    State(state): State<AppState>,
    Path((contract, token_id)): Path<(String, String)>,
) -> Result<Json<InfringementStatus>, ApiError> {
    infringement(&state, &ids::token_id(&contract, token_id)).await
}
