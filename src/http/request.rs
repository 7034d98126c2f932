//! Request handling: correlation ids, body decoding, parameter parsing.

use std::str::FromStr;

use alloy::primitives::{utils::parse_ether, Address, U256};
use axum::{
    body::Body,
    extract::rejection::JsonRejection,
    http::{HeaderMap, HeaderName, HeaderValue, Request},
    Json,
};
use serde_json::Value;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

use crate::http::response::ApiError;

pub const X_REQUEST_ID: &str = "x-request-id";

/// UUID v4 request ids.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Assigns an id to requests that arrive without one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Copies the request id onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Span for one request, carrying its correlation id.
pub fn request_span(request: &Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request.headers()),
    )
}

/// Unwrap a JSON body, turning decode failures into a 400.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::bad_request(format!(
            "Invalid JSON body: {}",
            rejection.body_text()
        ))),
    }
}

pub fn parse_address(raw: &str) -> Option<Address> {
    Address::from_str(raw.trim()).ok()
}

/// A non-negative integer given as a JSON number or a decimal/hex string.
pub fn parse_uint(value: &Value) -> Option<U256> {
    match value {
        Value::Number(n) => n.as_u64().map(U256::from),
        Value::String(s) if !s.trim().is_empty() => U256::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Like [`parse_uint`], but zero counts as absent.
pub fn parse_nonzero_uint(value: Option<&Value>) -> Option<U256> {
    value.and_then(parse_uint).filter(|v| !v.is_zero())
}

/// An ether amount ("0.5", 1) converted to wei. Must be positive.
pub fn parse_ether_amount(value: &Value) -> Option<U256> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    if text.starts_with('-') {
        return None;
    }
    parse_ether(&text).ok().filter(|wei| !wei.is_zero())
}
