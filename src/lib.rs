//! ModredIP backend library: IP registration on Etherlink with Yakoa
//! infringement monitoring and IPFS pinning.

pub mod blockchain;
pub mod config;
pub mod http;
pub mod ipfs;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod yakoa;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
