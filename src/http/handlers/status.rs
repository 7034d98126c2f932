//! Service status endpoints.

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics::record_dependency_health;

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "ModredIP Backend API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "timestamp": now(),
        "endpoints": {
            "health": "/health",
            "register": "/api/register",
            "license": "/api/license/mint",
            "royalty": "/api/royalty",
            "assets": "/api/assets",
            "licenses": "/api/licenses",
            "yakoa": "/api/yakoa",
            "infringement": "/api/infringement",
            "ipfs": "/api/ipfs",
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": now(),
        "uptime": state.started_at.elapsed().as_secs_f64(),
        "environment": state.config.listener.environment,
    }))
}

/// 200 when the chain RPC answers, 503 otherwise.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let chain = match &state.registry {
        Some(registry) => registry.is_healthy().await,
        None => false,
    };
    record_dependency_health("etherlink", chain);

    let status = if chain {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(json!({
            "status": if chain { "ready" } else { "not_ready" },
            "checks": {
                "blockchain": chain,
                "yakoa": state.yakoa.is_configured(),
                "ipfs": state.pinata.is_some(),
            }
        })),
    )
}

pub async fn proxy_health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "Yakoa proxy server is running" }))
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Route {} not found", uri.path()))
}
