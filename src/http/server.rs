//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with every API route
//! - Wire up middleware (CORS, request id, tracing, metrics, limits, timeout)
//! - Bind to the listener and shut down gracefully

use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy::primitives::Address;
use axum::{
    extract::DefaultBodyLimit,
    handler::Handler,
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::blockchain::IpRegistry;
use crate::config::AppConfig;
use crate::http::cors::cors_layer;
use crate::http::handlers::{assets, ipfs, license, register, royalty, status, yakoa};
use crate::http::request::{
    parse_address, propagate_request_id_layer, request_span, set_request_id_layer,
};
use crate::http::response::{ApiError, CHAIN_UNAVAILABLE};
use crate::ipfs::{PinataClient, PinataError};
use crate::observability::metrics;
use crate::yakoa::{YakoaClient, YakoaError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// `None` when the chain integration is disabled.
    pub registry: Option<Arc<dyn IpRegistry>>,
    pub yakoa: YakoaClient,
    /// `None` when no Pinata JWT is configured.
    pub pinata: Option<PinataClient>,
    pub started_at: Instant,
}

impl AppState {
    pub fn registry(&self) -> Result<&dyn IpRegistry, ApiError> {
        self.registry.as_deref().ok_or_else(|| ApiError::Unavailable {
            error: CHAIN_UNAVAILABLE,
            message: "Blockchain integration is disabled".to_string(),
        })
    }

    pub fn pinata(&self) -> Result<&PinataClient, ApiError> {
        self.pinata
            .as_ref()
            .ok_or_else(|| ApiError::pinata(PinataError::NotConfigured))
    }

    /// The contract named in the request, else the configured one.
    pub fn contract_or_default(&self, requested: Option<&str>) -> Result<Address, ApiError> {
        let raw = requested
            .filter(|c| !c.trim().is_empty())
            .or(self.config.blockchain.contract_address.as_deref())
            .ok_or_else(|| {
                ApiError::bad_request(
                    "Missing contract address: pass ?contract= or configure MODRED_IP_CONTRACT",
                )
            })?;
        parse_address(raw).ok_or_else(|| ApiError::bad_request("Invalid contract address"))
    }
}

/// Errors building the server's outbound clients.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Yakoa(#[from] YakoaError),
    #[error(transparent)]
    Pinata(#[from] PinataError),
}

/// HTTP server for the ModredIP API.
pub struct HttpServer {
    router: Router,
    config: Arc<AppConfig>,
}

impl HttpServer {
    /// Create a server with the given configuration and contract registry.
    pub fn new(
        config: AppConfig,
        registry: Option<Arc<dyn IpRegistry>>,
    ) -> Result<Self, ServerError> {
        let yakoa = YakoaClient::new(&config.yakoa, &config.timeouts, config.retries.clone())?;
        let pinata = PinataClient::from_config(&config.pinata, &config.timeouts)?;
        let config = Arc::new(config);

        let state = AppState {
            config: config.clone(),
            registry,
            yakoa,
            pinata,
            started_at: Instant::now(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let api = Router::new()
            .route("/health", get(status::proxy_health))
            .route("/register", post(register::register_ip))
            .route("/license", post(license::mint_license))
            .route("/license/mint", post(license::mint_license))
            .route("/royalty/pay", post(royalty::pay_royalty))
            .route("/royalty/claim", post(royalty::claim_royalties))
            .route("/assets", get(assets::list_assets))
            .route("/assets/{id}", get(assets::get_asset))
            .route("/licenses", get(assets::list_all_licenses))
            .route("/licenses/{id}", get(assets::get_license))
            .route("/yakoa/register", post(yakoa::proxy_registration))
            .route("/yakoa/token/{id}", get(yakoa::get_token))
            .route("/infringement/{id}", get(yakoa::infringement_by_id))
            .route(
                "/infringement/contract/{contract_address}/{token_id}",
                get(yakoa::infringement_by_contract),
            )
            .route("/ipfs/upload", post(ipfs::upload_file))
            .route("/ipfs/metadata", post(ipfs::upload_metadata));

        Router::new()
            .route("/", get(status::index))
            .route("/health", get(status::health))
            .route("/health/ready", get(status::ready))
            .nest("/api", api)
            .route_layer(middleware::from_fn(metrics::track_requests))
            .fallback(status::not_found.layer(middleware::from_fn(metrics::track_requests)))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(set_request_id_layer())
            .layer(cors_layer(config))
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            environment = %self.config.listener.environment,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
