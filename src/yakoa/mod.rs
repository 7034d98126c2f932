//! Yakoa IP API integration.
//!
//! # Data Flow
//! ```text
//! Registration route:
//!     → payload.rs (metadata string → TokenRegistration)
//!     → client.rs (POST /token, 409 → alreadyRegistered)
//!
//! Browser proxy:
//!     → client.rs (forward body verbatim)
//!     → mock.rs (stand-in answer when Yakoa is unreachable)
//!
//! Reads:
//!     → ids.rs (base id)
//!     → client.rs (GET /token/{id}, retried)
//!     → types.rs (infringement summary)
//! ```

pub mod client;
pub mod ids;
pub mod mock;
pub mod payload;
pub mod types;

pub use client::{YakoaClient, YakoaReply};
pub use types::{InfringementStatus, ProxyRegistrationResponse, TokenRegistration, YakoaError};
