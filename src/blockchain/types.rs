//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash, U256};
use serde::Serialize;
use thiserror::Error;

pub use crate::config::schema::BlockchainConfig;

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was not confirmed within expected time.
    #[error("Transaction {0} not confirmed in time")]
    ConfirmationTimeout(TxHash),

    /// Call simulation or mined transaction reverted.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Entity does not exist on-chain.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: U256 },

    /// Blockchain client not initialized or disabled.
    #[error("Blockchain not available: {0}")]
    NotAvailable(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Serialize integers as decimal strings so JSON clients never lose precision.
pub mod decimal {
    use serde::Serializer;
    use std::fmt::Display;

    pub fn serialize<T: Display, S: Serializer>(
        value: &T,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub mod option {
        use serde::Serializer;
        use std::fmt::Display;

        pub fn serialize<T: Display, S: Serializer>(
            value: &Option<T>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => serializer.collect_str(v),
                None => serializer.serialize_none(),
            }
        }
    }
}

/// Outcome of a mined contract write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOutcome {
    pub tx_hash: TxHash,
    #[serde(with = "decimal")]
    pub block_number: u64,
    pub explorer_url: String,
}

/// Result of `registerIP`, with the token id decoded from the receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub tx: TxOutcome,
    pub ip_asset_id: Option<U256>,
}

/// Arguments of `registerIP`.
#[derive(Debug, Clone)]
pub struct RegisterIpCall {
    pub ip_hash: String,
    pub metadata: String,
    pub is_encrypted: bool,
}

/// Arguments of `mintLicense`.
#[derive(Debug, Clone)]
pub struct MintLicenseCall {
    pub token_id: U256,
    pub royalty_percentage: U256,
    pub duration: U256,
    pub commercial_use: bool,
    pub terms: String,
}

/// On-chain IP asset record, as returned by `getIPAsset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IpAsset {
    #[serde(with = "decimal")]
    pub id: U256,
    pub owner: Address,
    pub ip_hash: String,
    pub metadata: String,
    pub is_encrypted: bool,
    pub is_disputed: bool,
    #[serde(with = "decimal")]
    pub registration_date: U256,
    #[serde(with = "decimal")]
    pub total_revenue: U256,
    #[serde(with = "decimal")]
    pub royalty_tokens: U256,
}

/// On-chain license record, as returned by `getLicense`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    #[serde(with = "decimal")]
    pub id: U256,
    pub licensee: Address,
    #[serde(with = "decimal")]
    pub token_id: U256,
    #[serde(with = "decimal")]
    pub royalty_percentage: U256,
    #[serde(with = "decimal")]
    pub duration: U256,
    #[serde(with = "decimal")]
    pub start_date: U256,
    pub is_active: bool,
    pub commercial_use: bool,
    pub terms: String,
}

/// Explorer link for a transaction.
pub fn explorer_tx_url(explorer_root: &str, tx_hash: &TxHash) -> String {
    format!("{}/tx/{}", explorer_root.trim_end_matches('/'), tx_hash)
}
