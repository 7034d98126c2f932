//! HTTP client for the Yakoa IP API.
//!
//! Registration is never retried; reads go through [`with_retries`].

use std::time::Duration;

use reqwest::{header, StatusCode};
use serde_json::Value;

use super::ids;
use super::types::{InfringementStatus, TokenRegistration, YakoaError};
use crate::config::{RetryConfig, TimeoutConfig, YakoaConfig};
use crate::observability::metrics::record_yakoa_call;
use crate::resilience::retries::{is_retryable, with_retries};

/// Raw answer from Yakoa: status plus decoded body.
#[derive(Debug, Clone)]
pub struct YakoaReply {
    pub status: StatusCode,
    pub body: Value,
}

#[derive(Clone)]
pub struct YakoaClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    retry: RetryConfig,
}

impl std::fmt::Debug for YakoaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YakoaClient")
            .field("base_url", &self.base_url)
            .field("configured", &self.is_configured())
            .finish()
    }
}

fn should_retry(err: &YakoaError) -> bool {
    match err {
        YakoaError::Transport(_) => true,
        YakoaError::Api { status, .. } => {
            let status = StatusCode::from_u16(*status).ok();
            is_retryable(status, false) || status.is_some_and(|s| s.is_server_error())
        }
        _ => false,
    }
}

/// Decode a body as JSON, falling back to the raw text.
async fn read_body(response: reqwest::Response) -> Value {
    match response.text().await {
        Ok(text) if text.is_empty() => Value::Null,
        Ok(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        Err(_) => Value::Null,
    }
}

impl YakoaClient {
    pub fn new(
        config: &YakoaConfig,
        timeouts: &TimeoutConfig,
        retry: RetryConfig,
    ) -> Result<Self, YakoaError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base(),
            api_key: config.api_key.clone(),
            retry,
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn token_url(&self) -> String {
        format!("{}/token", self.base_url)
    }

    fn ensure_configured(&self) -> Result<(), YakoaError> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(YakoaError::NotConfigured)
        }
    }

    fn post(&self, body: &impl serde::Serialize) -> reqwest::RequestBuilder {
        self.http
            .post(self.token_url())
            .header("X-API-KEY", &self.api_key)
            .header(header::ACCEPT, "application/json")
            .json(body)
    }

    /// Register a token. A 409 is not an error: the existing token comes back
    /// with `alreadyRegistered: true`.
    pub async fn register_token(
        &self,
        registration: &TokenRegistration,
    ) -> Result<Value, YakoaError> {
        self.ensure_configured()?;
        tracing::debug!(token = %registration.id, "Registering token with Yakoa");

        let response = self.post(registration).send().await.inspect_err(|e| {
            record_yakoa_call("register", "error");
            tracing::error!(token = %registration.id, error = %e, "Yakoa unreachable");
        })?;
        let status = response.status();
        let body = read_body(response).await;

        if status.is_success() {
            record_yakoa_call("register", "ok");
            tracing::info!(token = %registration.id, "Token registered with Yakoa");
            return Ok(mark_registered(body, false));
        }

        if status == StatusCode::CONFLICT {
            record_yakoa_call("register", "conflict");
            tracing::info!(token = %registration.id, "Token already registered with Yakoa");
            let existing = match self.get_token(&registration.id).await {
                Ok(token) => token,
                Err(e) => {
                    tracing::warn!(
                        token = %registration.id,
                        error = %e,
                        "Could not fetch existing Yakoa token"
                    );
                    body
                }
            };
            return Ok(mark_registered(existing, true));
        }

        record_yakoa_call("register", "error");
        tracing::error!(
            token = %registration.id,
            status = status.as_u16(),
            body = %body,
            "Yakoa registration rejected"
        );
        Err(YakoaError::Api {
            status: status.as_u16(),
            body,
        })
    }

    /// Forward an arbitrary registration body and hand back whatever Yakoa says.
    pub async fn forward_registration(&self, body: &Value) -> Result<YakoaReply, YakoaError> {
        let response = self.post(body).send().await.inspect_err(|e| {
            record_yakoa_call("proxy", "error");
            tracing::error!(error = %e, "Yakoa unreachable from proxy");
        })?;
        let status = response.status();
        let body = read_body(response).await;
        record_yakoa_call("proxy", if status.is_success() { "ok" } else { "rejected" });

        Ok(YakoaReply { status, body })
    }

    async fn fetch_token(&self, id: &str) -> Result<Value, YakoaError> {
        let response = self
            .http
            .get(format!("{}/{}", self.token_url(), id))
            .header("X-API-KEY", &self.api_key)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        let body = read_body(response).await;

        match status {
            s if s.is_success() => Ok(body),
            StatusCode::NOT_FOUND => Err(YakoaError::NotFound(id.to_string())),
            s => Err(YakoaError::Api {
                status: s.as_u16(),
                body,
            }),
        }
    }

    /// Fetch a token by id. Timestamp-suffixed ids are reduced to their base id.
    pub async fn get_token(&self, id: &str) -> Result<Value, YakoaError> {
        self.ensure_configured()?;
        let id = ids::base_id(id);

        let result = with_retries(
            &self.retry,
            "yakoa_get_token",
            || self.fetch_token(&id),
            should_retry,
        )
        .await;
        record_yakoa_call(
            "get_token",
            match &result {
                Ok(_) => "ok",
                Err(YakoaError::NotFound(_)) => "not_found",
                Err(_) => "error",
            },
        );
        result
    }

    /// True when Yakoa knows the token, false on 404.
    pub async fn token_exists(&self, id: &str) -> Result<bool, YakoaError> {
        match self.get_token(id).await {
            Ok(_) => Ok(true),
            Err(YakoaError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn infringement_status(&self, id: &str) -> Result<InfringementStatus, YakoaError> {
        let token = self.get_token(id).await?;
        Ok(InfringementStatus::from_token(&token))
    }
}

fn mark_registered(body: Value, already: bool) -> Value {
    match body {
        Value::Object(mut map) => {
            map.insert("alreadyRegistered".into(), Value::Bool(already));
            Value::Object(map)
        }
        other => serde_json::json!({ "alreadyRegistered": already, "response": other }),
    }
}
