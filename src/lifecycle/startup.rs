//! Startup orchestration.
//!
//! Config is loaded first, then the chain client, then the listener. A bad
//! signer key is fatal; a missing one leaves the service read-only.

use std::sync::Arc;

use crate::blockchain::wallet::PRIVATE_KEY_ENV_VAR;
use crate::blockchain::{BlockchainResult, IpRegistry, RpcRegistry, Wallet};
use crate::config::validation::missing_credentials;
use crate::config::AppConfig;

/// Build the contract client, or `None` when the chain integration is disabled.
pub async fn build_registry(config: &AppConfig) -> BlockchainResult<Option<Arc<dyn IpRegistry>>> {
    if !config.blockchain.enabled {
        tracing::warn!("Blockchain integration disabled, chain routes will answer 503");
        return Ok(None);
    }

    let wallet = Wallet::from_env(config.blockchain.chain_id)?;
    if wallet.is_none() {
        tracing::warn!(
            var = PRIVATE_KEY_ENV_VAR,
            "No signer key set, contract writes will answer 503"
        );
    }

    let registry = RpcRegistry::new(config.blockchain.clone(), wallet)?;
    if let Err(e) = registry.verify_chain_id().await {
        tracing::warn!(error = %e, "Could not verify chain id, continuing");
    }

    let registry: Arc<dyn IpRegistry> = Arc::new(registry);
    Ok(Some(registry))
}

/// Warn about unset API credentials. The service still starts.
pub fn report_missing_credentials(config: &AppConfig) {
    for var in missing_credentials(config) {
        tracing::warn!(var, "Credential not configured, dependent routes are degraded");
    }
}
