//! Error responses.
//!
//! Every failure leaves the service as `{ "error": ..., "details"|"message": ... }`
//! with a status that says whose fault it was.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::blockchain::BlockchainError;
use crate::ipfs::PinataError;
use crate::yakoa::YakoaError;

pub const CHAIN_UNAVAILABLE: &str = "Blockchain service unavailable";

#[derive(Debug, Error)]
pub enum ApiError {
    /// 400 `{ error }`.
    #[error("{0}")]
    BadRequest(String),

    /// 404 `{ error: "Not found", message }`.
    #[error("{0}")]
    NotFound(String),

    /// 503 `{ error, message }`.
    #[error("{error}: {message}")]
    Unavailable { error: &'static str, message: String },

    /// Any status with `{ error, details }`.
    #[error("{error}: {details}")]
    Failed {
        status: StatusCode,
        error: String,
        details: Value,
    },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn internal(error: impl Into<String>, details: impl std::fmt::Display) -> Self {
        ApiError::Failed {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: error.into(),
            details: Value::String(details.to_string()),
        }
    }

    /// Map a contract failure, labelling generic failures with `context`.
    pub fn chain(context: &str, err: BlockchainError) -> Self {
        match err {
            BlockchainError::NotAvailable(message) => ApiError::Unavailable {
                error: CHAIN_UNAVAILABLE,
                message,
            },
            BlockchainError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            other => {
                tracing::error!(error = %other, context, "Contract call failed");
                ApiError::internal(context, other)
            }
        }
    }

    pub fn yakoa(err: YakoaError) -> Self {
        match err {
            YakoaError::NotFound(_) => ApiError::NotFound(err.to_string()),
            YakoaError::NotConfigured => ApiError::Unavailable {
                error: "Yakoa service unavailable",
                message: err.to_string(),
            },
            YakoaError::Api { status, body } => ApiError::Failed {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                error: format!("Yakoa API error: {}", status),
                details: body,
            },
            YakoaError::Transport(e) => {
                tracing::error!(error = %e, "Yakoa request failed");
                ApiError::Failed {
                    status: StatusCode::BAD_GATEWAY,
                    error: "Yakoa request failed".to_string(),
                    details: Value::String(e.to_string()),
                }
            }
        }
    }

    pub fn pinata(err: PinataError) -> Self {
        match err {
            PinataError::NotConfigured => ApiError::Unavailable {
                error: "IPFS service unavailable",
                message: err.to_string(),
            },
            other => {
                tracing::error!(error = %other, "Pinata request failed");
                ApiError::Failed {
                    status: StatusCode::BAD_GATEWAY,
                    error: "IPFS upload failed".to_string(),
                    details: Value::String(other.to_string()),
                }
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Failed { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest(error) => json!({ "error": error }),
            ApiError::NotFound(message) => json!({ "error": "Not found", "message": message }),
            ApiError::Unavailable { error, message } => {
                json!({ "error": error, "message": message })
            }
            ApiError::Failed { error, details, .. } => {
                json!({ "error": error, "details": details })
            }
        };
        (status, Json(body)).into_response()
    }
}
