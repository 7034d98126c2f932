//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! modred.toml (optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (PORT, YAKOA_API_KEY, ...)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared via Arc to all handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - The signer key never lives here; see `blockchain::wallet`

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_with_env, ConfigError};
pub use schema::AppConfig;
pub use schema::{
    BlockchainConfig, CorsConfig, ListenerConfig, ObservabilityConfig, PinataConfig,
    RetryConfig, SecurityConfig, TimeoutConfig, YakoaConfig,
};
