//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → cors.rs (allowlist or mirrored origin)
//!     → request.rs (request id, JSON body and parameter parsing)
//!     → handlers/ (chain, Yakoa, IPFS calls)
//!     → response.rs (errors to status + JSON)
//! ```

pub mod cors;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::ApiError;
pub use server::{AppState, HttpServer, ServerError};
