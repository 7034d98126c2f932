//! The contract operations the HTTP layer needs, behind a trait.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::blockchain::types::{
    BlockchainResult, IpAsset, License, MintLicenseCall, RegisterIpCall, Registration, TxOutcome,
};

/// Reads and writes against a deployed ModredIP registry.
///
/// Every method takes the contract address explicitly: the frontend sends it
/// with each request.
#[async_trait]
pub trait IpRegistry: Send + Sync {
    /// Simulate, send and await `registerIP`.
    async fn register_ip(
        &self,
        contract: Address,
        call: RegisterIpCall,
    ) -> BlockchainResult<Registration>;

    /// Simulate, send and await `mintLicense`.
    async fn mint_license(
        &self,
        contract: Address,
        call: MintLicenseCall,
    ) -> BlockchainResult<TxOutcome>;

    /// Send `payRevenue(tokenId)` with `value` wei attached.
    async fn pay_revenue(
        &self,
        contract: Address,
        token_id: U256,
        value: U256,
    ) -> BlockchainResult<TxOutcome>;

    /// Send `claimRoyalties(tokenId)`.
    async fn claim_royalties(&self, contract: Address, token_id: U256)
        -> BlockchainResult<TxOutcome>;

    async fn next_token_id(&self, contract: Address) -> BlockchainResult<U256>;

    async fn next_license_id(&self, contract: Address) -> BlockchainResult<U256>;

    async fn ip_asset(&self, contract: Address, token_id: U256) -> BlockchainResult<IpAsset>;

    async fn license(&self, contract: Address, license_id: U256) -> BlockchainResult<License>;

    /// Liveness check of the RPC endpoint.
    async fn is_healthy(&self) -> bool;
}

/// Read every IP asset from 1 to `nextTokenId - 1`, skipping ids that fail.
pub async fn list_ip_assets(
    registry: &dyn IpRegistry,
    contract: Address,
) -> BlockchainResult<Vec<IpAsset>> {
    let next = registry.next_token_id(contract).await?;
    let mut assets = Vec::new();
    let mut id = U256::from(1);
    while id < next {
        match registry.ip_asset(contract, id).await {
            Ok(asset) => assets.push(asset),
            Err(e) => tracing::debug!(token_id = %id, error = %e, "Skipping unreadable IP asset"),
        }
        id += U256::from(1);
    }
    Ok(assets)
}

/// Read every license from 1 to `nextLicenseId - 1`, skipping ids that fail.
pub async fn list_licenses(
    registry: &dyn IpRegistry,
    contract: Address,
) -> BlockchainResult<Vec<License>> {
    let next = registry.next_license_id(contract).await?;
    let mut licenses = Vec::new();
    let mut id = U256::from(1);
    while id < next {
        match registry.license(contract, id).await {
            Ok(license) => licenses.push(license),
            Err(e) => tracing::debug!(license_id = %id, error = %e, "Skipping unreadable license"),
        }
        id += U256::from(1);
    }
    Ok(licenses)
}
