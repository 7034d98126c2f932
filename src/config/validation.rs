//! Configuration validation.
//!
//! Serde handles syntax; this pass checks values. All errors are collected,
//! not just the first. Missing credentials are warnings: the service still
//! starts and the affected routes answer 503.

use std::fmt;

use alloy::primitives::Address;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    check_url(&mut errors, "blockchain.rpc_url", &config.blockchain.rpc_url);
    check_url(&mut errors, "blockchain.explorer_url", &config.blockchain.explorer_url);
    check_url(&mut errors, "pinata.api_url", &config.pinata.api_url);
    check_url(&mut errors, "pinata.gateway_url", &config.pinata.gateway_url);
    check_url(&mut errors, "yakoa.base_url", &config.yakoa.api_base());

    if let Some(addr) = &config.blockchain.contract_address {
        if addr.parse::<Address>().is_err() {
            errors.push(ValidationError::new(
                "blockchain.contract_address",
                format!("'{}' is not an address", addr),
            ));
        }
    }

    if config.blockchain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be > 0"));
    }
    if config.blockchain.receipt_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.receipt_timeout_secs", "must be > 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::new("timeouts.upstream_secs", "must be > 0"));
    }
    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be >= 1"));
    }
    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::new(
            "retries.base_delay_ms",
            "must not exceed retries.max_delay_ms",
        ));
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be > 0"));
    }
    if !matches!(config.observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::new(
            "observability.log_format",
            "must be \"pretty\" or \"json\"",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Names of credentials that are unset. Reported at startup, never fatal.
pub fn missing_credentials(config: &AppConfig) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if config.yakoa.api_key.is_empty() {
        missing.push("YAKOA_API_KEY");
    }
    if config.pinata.jwt.is_empty() {
        missing.push("PINATA_JWT");
    }
    missing
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if let Err(e) = url::Url::parse(value) {
        errors.push(ValidationError::new(field, format!("'{}' is not a URL: {}", value, e)));
    }
}
