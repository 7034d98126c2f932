//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the backend.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the backend service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address, environment name).
    pub listener: ListenerConfig,

    /// Cross-origin policy for the browser frontend.
    pub cors: CorsConfig,

    /// Yakoa copyright-monitoring API.
    pub yakoa: YakoaConfig,

    /// Pinata IPFS pinning API.
    pub pinata: PinataConfig,

    /// Blockchain integration settings.
    pub blockchain: BlockchainConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Retry configuration for idempotent outbound reads.
    pub retries: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

impl AppConfig {
    /// True when running in the `development` environment.
    pub fn is_development(&self) -> bool {
        self.listener.environment == "development"
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,

    /// Deployment environment name ("development", "production", ...).
    pub environment: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed outside development.
    pub allowed_origins: Vec<String>,

    /// Frontend deployment URL, appended to the allowlist.
    pub frontend_url: Option<String>,

    /// Extra origins, appended to the allowlist.
    pub additional_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "https://usemodred.vercel.app".to_string(),
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
                "http://localhost:4173".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "http://127.0.0.1:5173".to_string(),
                "http://127.0.0.1:4173".to_string(),
            ],
            frontend_url: None,
            additional_origins: Vec::new(),
        }
    }
}

impl CorsConfig {
    /// Full allowlist with trailing slashes removed and duplicates dropped.
    pub fn origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = Vec::new();
        let all = self
            .allowed_origins
            .iter()
            .chain(self.frontend_url.iter())
            .chain(self.additional_origins.iter());

        for origin in all {
            let normalized = origin.trim().trim_end_matches('/').to_string();
            if !normalized.is_empty() && !origins.contains(&normalized) {
                origins.push(normalized);
            }
        }
        origins
    }
}

/// Yakoa API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct YakoaConfig {
    /// API key sent as `X-API-KEY`.
    pub api_key: String,

    /// Customer subdomain in the sandbox host name.
    pub subdomain: String,

    /// Network segment of the API path.
    pub network: String,

    /// Overrides the URL derived from subdomain and network.
    pub base_url: Option<String>,

    /// Answer the registration proxy with a mock success when Yakoa is unreachable.
    pub mock_fallback: bool,

    /// Contact email used when asset metadata carries none.
    pub default_creator_email: String,
}

impl Default for YakoaConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            subdomain: "docs-demo".to_string(),
            network: "docs-demo".to_string(),
            base_url: None,
            mock_fallback: false,
            default_creator_email: "creator@modredip.com".to_string(),
        }
    }
}

impl YakoaConfig {
    /// Base URL of the token API, without a trailing slash.
    pub fn api_base(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!(
                "https://{}.ip-api-sandbox.yakoa.io/{}",
                self.subdomain, self.network
            ),
        }
    }
}

/// Pinata pinning configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PinataConfig {
    /// JWT used as the Bearer token.
    pub jwt: String,

    /// Pinata API root.
    pub api_url: String,

    /// IPFS gateway used for display URLs.
    pub gateway_url: String,
}

impl Default for PinataConfig {
    fn default() -> Self {
        Self {
            jwt: String::new(),
            api_url: "https://api.pinata.cloud".to_string(),
            gateway_url: "https://gateway.pinata.cloud".to_string(),
        }
    }
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// Enable blockchain integration.
    pub enabled: bool,

    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Chain ID (128123 for Etherlink testnet).
    pub chain_id: u64,

    /// Block explorer root used for transaction links.
    pub explorer_url: String,

    /// Default registry contract, used when a read request names none.
    pub contract_address: Option<String>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Maximum time to wait for a transaction receipt.
    pub receipt_timeout_secs: u64,

    /// Number of block confirmations to wait for.
    pub confirmation_blocks: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rpc_url: "https://node.ghostnet.etherlink.com".to_string(),
            chain_id: 128123,
            explorer_url: "https://testnet.explorer.etherlink.com".to_string(),
            contract_address: None,
            rpc_timeout_secs: 10,
            receipt_timeout_secs: 90,
            confirmation_blocks: 1,
        }
    }
}

/// Timeout configuration for inbound requests and outbound HTTP calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed to serve one inbound request, in seconds.
    pub request_secs: u64,

    /// Timeout for outbound HTTP calls to Yakoa and Pinata, in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 120,
            upstream_secs: 30,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries.
    pub enabled: bool,

    /// Maximum number of attempts, first one included.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// "pretty" or "json".
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 10 * 1024 * 1024, // 10MB, file uploads go through here
        }
    }
}
