//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound Yakoa read:
//!     → retries.rs (classify failure, retry idempotent calls)
//!     → backoff.rs (exponential delay with jitter)
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline (reqwest client timeout, RPC timeout)
//! - Retries only for idempotent reads
//! - Registration proxy falls back to a mock answer instead of retrying

pub mod backoff;
pub mod retries;
