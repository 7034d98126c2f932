//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {message}")]
    Env { var: &'static str, message: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load the file if it exists, apply process environment overrides, then validate.
///
/// A missing file is not an error: defaults plus environment are enough to run.
pub fn load_with_env(path: &Path) -> Result<AppConfig, ConfigError> {
    let mut config = if path.exists() {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)?
    } else {
        tracing::info!(path = %path.display(), "Config file not found, using defaults");
        AppConfig::default()
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto a configuration.
///
/// `lookup` abstracts the environment so tests don't touch process state.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(port) = get("PORT") {
        let port: u16 = port.trim().parse().map_err(|_| ConfigError::Env {
            var: "PORT",
            message: format!("'{}' is not a port number", port),
        })?;
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.listener.bind_address = format!("{}:{}", host, port);
    }
    if let Some(env) = get("NODE_ENV") {
        config.listener.environment = env;
    }

    if let Some(key) = get("YAKOA_API_KEY") {
        config.yakoa.api_key = key;
    }
    if let Some(subdomain) = get("YAKOA_SUBDOMAIN") {
        config.yakoa.subdomain = subdomain;
    }
    if let Some(network) = get("YAKOA_NETWORK") {
        config.yakoa.network = network;
    }
    if let Some(base) = get("YAKOA_BASE_URL") {
        config.yakoa.base_url = Some(base);
    }

    if let Some(jwt) = get("PINATA_JWT") {
        config.pinata.jwt = jwt;
    }
    if let Some(api) = get("PINATA_API_URL") {
        config.pinata.api_url = api;
    }

    if let Some(rpc) = get("RPC_PROVIDER_URL") {
        config.blockchain.rpc_url = rpc;
    }
    if let Some(chain_id) = get("ETHERLINK_CHAIN_ID") {
        config.blockchain.chain_id = chain_id.trim().parse().map_err(|_| ConfigError::Env {
            var: "ETHERLINK_CHAIN_ID",
            message: format!("'{}' is not a chain id", chain_id),
        })?;
    }
    if let Some(contract) = get("MODRED_IP_CONTRACT") {
        config.blockchain.contract_address = Some(contract);
    }

    if let Some(frontend) = get("FRONTEND_URL") {
        config.cors.frontend_url = Some(frontend);
    }
    if let Some(extra) = get("ADDITIONAL_CORS_ORIGINS") {
        config
            .cors
            .additional_origins
            .extend(extra.split(',').map(|s| s.trim().to_string()));
    }

    if let Some(level) = get("LOG_LEVEL") {
        config.observability.log_level = level;
    }

    Ok(())
}
