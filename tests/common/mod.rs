//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;
use tokio::net::TcpListener;

use modred_backend::blockchain::types::{
    IpAsset, License, MintLicenseCall, RegisterIpCall, Registration, TxOutcome,
};
use modred_backend::blockchain::{BlockchainError, BlockchainResult, IpRegistry};
use modred_backend::config::AppConfig;
use modred_backend::{HttpServer, Shutdown};

pub const CONTRACT: &str = "0x8f0a1ac6ca4f8cb0417112069c0f4dc93b9f0217";
pub const BLOCK_NUMBER: u64 = 4242;

pub fn tx_hash() -> B256 {
    B256::repeat_byte(0xab)
}

pub fn tx_outcome() -> TxOutcome {
    TxOutcome {
        tx_hash: tx_hash(),
        block_number: BLOCK_NUMBER,
        explorer_url: format!("https://testnet.explorer.etherlink.com/tx/{}", tx_hash()),
    }
}

/// How the in-memory registry answers writes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum WriteMode {
    #[default]
    Succeed,
    Revert,
    NoSigner,
}

/// In-memory stand-in for the ModredIP contract.
#[derive(Default)]
pub struct MockRegistry {
    pub write_mode: WriteMode,
    /// Token id "emitted" by `registerIP`.
    pub minted_id: Option<U256>,
    pub assets: Vec<IpAsset>,
    pub licenses: Vec<License>,
    pub calls: Mutex<Vec<String>>,
    pub paid: Mutex<Vec<(U256, U256)>>,
}

impl MockRegistry {
    pub fn minting(id: u64) -> Self {
        Self {
            minted_id: Some(U256::from(id)),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn write(&self, name: &str) -> BlockchainResult<TxOutcome> {
        self.calls.lock().unwrap().push(name.to_string());
        match self.write_mode {
            WriteMode::Succeed => Ok(tx_outcome()),
            WriteMode::Revert => Err(BlockchainError::Reverted("execution reverted".into())),
            WriteMode::NoSigner => Err(BlockchainError::NotAvailable(
                "no signer configured for contract writes".into(),
            )),
        }
    }
}

#[async_trait]
impl IpRegistry for MockRegistry {
    async fn register_ip(
        &self,
        _contract: Address,
        _call: RegisterIpCall,
    ) -> BlockchainResult<Registration> {
        let tx = self.write("registerIP")?;
        Ok(Registration {
            tx,
            ip_asset_id: self.minted_id,
        })
    }

    async fn mint_license(
        &self,
        _contract: Address,
        _call: MintLicenseCall,
    ) -> BlockchainResult<TxOutcome> {
        self.write("mintLicense")
    }

    async fn pay_revenue(
        &self,
        _contract: Address,
        token_id: U256,
        value: U256,
    ) -> BlockchainResult<TxOutcome> {
        let outcome = self.write("payRevenue")?;
        self.paid.lock().unwrap().push((token_id, value));
        Ok(outcome)
    }

    async fn claim_royalties(
        &self,
        _contract: Address,
        _token_id: U256,
    ) -> BlockchainResult<TxOutcome> {
        self.write("claimRoyalties")
    }

    async fn next_token_id(&self, _contract: Address) -> BlockchainResult<U256> {
        Ok(U256::from(self.assets.len() + 1))
    }

    async fn next_license_id(&self, _contract: Address) -> BlockchainResult<U256> {
        Ok(U256::from(self.licenses.len() + 1))
    }

    async fn ip_asset(&self, _contract: Address, token_id: U256) -> BlockchainResult<IpAsset> {
        self.assets
            .iter()
            .find(|a| a.id == token_id)
            .cloned()
            .ok_or(BlockchainError::NotFound { kind: "IP asset", id: token_id })
    }

    async fn license(&self, _contract: Address, license_id: U256) -> BlockchainResult<License> {
        self.licenses
            .iter()
            .find(|l| l.id == license_id)
            .cloned()
            .ok_or(BlockchainError::NotFound { kind: "License", id: license_id })
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}

pub fn sample_asset(id: u64, metadata: &str) -> IpAsset {
    IpAsset {
        id: U256::from(id),
        owner: Address::repeat_byte(0x11),
        ip_hash: format!("ipfs://QmFile{}", id),
        metadata: metadata.to_string(),
        is_encrypted: false,
        is_disputed: false,
        registration_date: U256::from(1_700_000_000u64),
        total_revenue: U256::ZERO,
        royalty_tokens: U256::from(100),
    }
}

pub fn sample_license(id: u64, token_id: u64) -> License {
    License {
        id: U256::from(id),
        licensee: Address::repeat_byte(0x22),
        token_id: U256::from(token_id),
        royalty_percentage: U256::from(10),
        duration: U256::from(86_400),
        start_date: U256::from(1_700_000_100u64),
        is_active: true,
        commercial_use: true,
        terms: "Standard terms".to_string(),
    }
}

/// Defaults suitable for tests: fast retries, no real upstreams.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.yakoa.api_key = "test-yakoa-key".to_string();
    config.yakoa.base_url = Some("http://127.0.0.1:1".to_string());
    config.retries.base_delay_ms = 1;
    config.retries.max_delay_ms = 5;
    config.timeouts.upstream_secs = 5;
    config
}

/// A running server and a handle to stop it.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the real server on an ephemeral port.
pub async fn spawn_server(config: AppConfig, registry: Option<Arc<dyn IpRegistry>>) -> TestServer {
    let server = HttpServer::new(config, registry).expect("server builds");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestServer { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
