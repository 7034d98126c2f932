//! JSON-RPC implementation of [`IpRegistry`].
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint, with the signer attached when present
//! - Simulate each write before sending it so reverts surface early
//! - Wait for receipts under a deadline and decode the minted token id
//! - Keep every read under the RPC timeout

use alloy::network::Ethereum;
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionReceipt;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::contract::ModredIP;
use crate::blockchain::receipt::extract_token_id;
use crate::blockchain::registry::IpRegistry;
use crate::blockchain::types::{
    explorer_tx_url, BlockchainConfig, BlockchainError, BlockchainResult, IpAsset, License,
    MintLicenseCall, RegisterIpCall, Registration, TxOutcome,
};
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;

/// Registry client backed by an alloy HTTP provider.
#[derive(Clone)]
pub struct RpcRegistry {
    provider: DynProvider,
    signer: Option<Address>,
    config: BlockchainConfig,
    rpc_timeout: Duration,
    receipt_timeout: Duration,
}

impl RpcRegistry {
    /// Build the provider. Without a wallet the client is read-only and
    /// writes fail with [`BlockchainError::NotAvailable`].
    pub fn new(config: BlockchainConfig, wallet: Option<Wallet>) -> BlockchainResult<Self> {
        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;

        let (provider, signer) = match wallet {
            Some(wallet) => {
                let provider = ProviderBuilder::new()
                    .wallet(wallet.network_wallet())
                    .connect_http(url)
                    .erased();
                (provider, Some(wallet.address()))
            }
            None => (ProviderBuilder::new().connect_http(url).erased(), None),
        };

        tracing::info!(
            rpc_url = %config.rpc_url,
            chain_id = config.chain_id,
            signer = ?signer,
            "Blockchain client initialized"
        );

        Ok(Self {
            provider,
            signer,
            rpc_timeout: Duration::from_secs(config.rpc_timeout_secs),
            receipt_timeout: Duration::from_secs(config.receipt_timeout_secs),
            config,
        })
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let actual = timeout(self.rpc_timeout, self.provider.get_chain_id())
            .await
            .map_err(|_| BlockchainError::Timeout(self.config.rpc_timeout_secs))?
            .map_err(|e| BlockchainError::Rpc(e.to_string()))?;

        if actual != self.config.chain_id {
            return Err(BlockchainError::Rpc(format!(
                "Chain ID mismatch: expected {}, got {}",
                self.config.chain_id, actual
            )));
        }
        Ok(())
    }

    pub fn signer(&self) -> Option<Address> {
        self.signer
    }

    fn require_signer(&self) -> BlockchainResult<Address> {
        self.signer.ok_or_else(|| {
            BlockchainError::NotAvailable("no signer configured for contract writes".to_string())
        })
    }

    fn contract(&self, address: Address) -> ModredIP::ModredIPInstance<DynProvider> {
        ModredIP::new(address, self.provider.clone())
    }

    /// Wait for the receipt of a sent transaction and reject reverts.
    async fn confirm(
        &self,
        operation: &'static str,
        pending: PendingTransactionBuilder<Ethereum>,
    ) -> BlockchainResult<TransactionReceipt> {
        let tx_hash = *pending.tx_hash();
        tracing::info!(operation, tx_hash = %tx_hash, "Transaction sent, waiting for receipt");

        let receipt = timeout(
            self.receipt_timeout,
            pending
                .with_required_confirmations(self.config.confirmation_blocks)
                .get_receipt(),
        )
        .await
        .map_err(|_| BlockchainError::ConfirmationTimeout(tx_hash))?
        .map_err(|e| BlockchainError::Rpc(format!("{} receipt: {}", operation, e)))?;

        if !receipt.status() {
            metrics::record_chain_tx(operation, false);
            return Err(BlockchainError::Reverted(format!(
                "{} transaction {} reverted",
                operation, tx_hash
            )));
        }

        metrics::record_chain_tx(operation, true);
        Ok(receipt)
    }

    fn outcome(&self, receipt: &TransactionReceipt) -> TxOutcome {
        TxOutcome {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number.unwrap_or_default(),
            explorer_url: explorer_tx_url(&self.config.explorer_url, &receipt.transaction_hash),
        }
    }

    fn timed_out(&self) -> BlockchainError {
        BlockchainError::Timeout(self.config.rpc_timeout_secs)
    }
}

fn simulation_error(operation: &str, e: alloy::contract::Error) -> BlockchainError {
    tracing::warn!(operation, error = %e, "Call simulation failed");
    BlockchainError::Reverted(format!("{} simulation failed: {}", operation, e))
}

fn send_error(operation: &str, e: alloy::contract::Error) -> BlockchainError {
    tracing::error!(operation, error = %e, "Failed to send transaction");
    metrics::record_chain_tx(operation, false);
    BlockchainError::Rpc(format!("{} send failed: {}", operation, e))
}

fn read_error(e: alloy::contract::Error) -> BlockchainError {
    BlockchainError::Rpc(e.to_string())
}

#[async_trait]
impl IpRegistry for RpcRegistry {
    async fn register_ip(
        &self,
        contract: Address,
        call: RegisterIpCall,
    ) -> BlockchainResult<Registration> {
        self.require_signer()?;
        let instance = self.contract(contract);
        let builder = instance.registerIP(call.ip_hash, call.metadata, call.is_encrypted);

        builder.call().await.map_err(|e| simulation_error("registerIP", e))?;
        let pending = builder.send().await.map_err(|e| send_error("registerIP", e))?;
        let receipt = self.confirm("registerIP", pending).await?;

        let ip_asset_id = extract_token_id(receipt.inner.logs().iter().map(|log| &log.inner.data));
        if ip_asset_id.is_none() {
            tracing::warn!(
                tx_hash = %receipt.transaction_hash,
                "No Transfer log in registration receipt"
            );
        }

        Ok(Registration {
            tx: self.outcome(&receipt),
            ip_asset_id,
        })
    }

    async fn mint_license(
        &self,
        contract: Address,
        call: MintLicenseCall,
    ) -> BlockchainResult<TxOutcome> {
        self.require_signer()?;
        let instance = self.contract(contract);
        let builder = instance.mintLicense(
            call.token_id,
            call.royalty_percentage,
            call.duration,
            call.commercial_use,
            call.terms,
        );

        builder.call().await.map_err(|e| simulation_error("mintLicense", e))?;
        let pending = builder.send().await.map_err(|e| send_error("mintLicense", e))?;
        let receipt = self.confirm("mintLicense", pending).await?;
        Ok(self.outcome(&receipt))
    }

    async fn pay_revenue(
        &self,
        contract: Address,
        token_id: U256,
        value: U256,
    ) -> BlockchainResult<TxOutcome> {
        self.require_signer()?;
        let instance = self.contract(contract);
        let builder = instance.payRevenue(token_id).value(value);

        builder.call().await.map_err(|e| simulation_error("payRevenue", e))?;
        let pending = builder.send().await.map_err(|e| send_error("payRevenue", e))?;
        let receipt = self.confirm("payRevenue", pending).await?;
        Ok(self.outcome(&receipt))
    }

    async fn claim_royalties(
        &self,
        contract: Address,
        token_id: U256,
    ) -> BlockchainResult<TxOutcome> {
        self.require_signer()?;
        let instance = self.contract(contract);
        let builder = instance.claimRoyalties(token_id);

        builder.call().await.map_err(|e| simulation_error("claimRoyalties", e))?;
        let pending = builder.send().await.map_err(|e| send_error("claimRoyalties", e))?;
        let receipt = self.confirm("claimRoyalties", pending).await?;
        Ok(self.outcome(&receipt))
    }

    async fn next_token_id(&self, contract: Address) -> BlockchainResult<U256> {
        let instance = self.contract(contract);
        timeout(self.rpc_timeout, instance.nextTokenId().call())
            .await
            .map_err(|_| self.timed_out())?
            .map_err(read_error)
    }

    async fn next_license_id(&self, contract: Address) -> BlockchainResult<U256> {
        let instance = self.contract(contract);
        timeout(self.rpc_timeout, instance.nextLicenseId().call())
            .await
            .map_err(|_| self.timed_out())?
            .map_err(read_error)
    }

    async fn ip_asset(&self, contract: Address, token_id: U256) -> BlockchainResult<IpAsset> {
        let instance = self.contract(contract);
        let raw = timeout(self.rpc_timeout, instance.getIPAsset(token_id).call())
            .await
            .map_err(|_| self.timed_out())?
            .map_err(read_error)?;

        if raw.owner.is_zero() {
            return Err(BlockchainError::NotFound {
                kind: "IP asset",
                id: token_id,
            });
        }

        Ok(IpAsset {
            id: token_id,
            owner: raw.owner,
            ip_hash: raw.ipHash,
            metadata: raw.metadata,
            is_encrypted: raw.isEncrypted,
            is_disputed: raw.isDisputed,
            registration_date: raw.registrationDate,
            total_revenue: raw.totalRevenue,
            royalty_tokens: raw.royaltyTokens,
        })
    }

    async fn license(&self, contract: Address, license_id: U256) -> BlockchainResult<License> {
        let instance = self.contract(contract);
        let raw = timeout(self.rpc_timeout, instance.getLicense(license_id).call())
            .await
            .map_err(|_| self.timed_out())?
            .map_err(read_error)?;

        if raw.licensee.is_zero() {
            return Err(BlockchainError::NotFound {
                kind: "License",
                id: license_id,
            });
        }

        Ok(License {
            id: license_id,
            licensee: raw.licensee,
            token_id: raw.tokenId,
            royalty_percentage: raw.royaltyPercentage,
            duration: raw.duration,
            start_date: raw.startDate,
            is_active: raw.isActive,
            commercial_use: raw.commercialUse,
            terms: raw.terms,
        })
    }

    async fn is_healthy(&self) -> bool {
        let healthy = matches!(
            timeout(self.rpc_timeout, self.provider.get_block_number()).await,
            Ok(Ok(_))
        );
        metrics::record_dependency_health("blockchain_rpc", healthy);
        healthy
    }
}

impl std::fmt::Debug for RpcRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcRegistry")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("signer", &self.signer)
            .finish()
    }
}
