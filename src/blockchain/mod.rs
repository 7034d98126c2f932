//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! WALLET_PRIVATE_KEY
//!     → wallet.rs (key loading)
//!     → client.rs (provider + signer, implements registry.rs)
//!     → contract.rs (typed ModredIP calls)
//!     → receipt.rs (token id from Transfer logs)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Graceful degradation when blockchain unreachable

pub mod client;
pub mod contract;
pub mod receipt;
pub mod registry;
pub mod types;
pub mod wallet;

pub use client::RpcRegistry;
pub use registry::IpRegistry;
pub use types::{BlockchainConfig, BlockchainError, BlockchainResult};
pub use wallet::Wallet;
