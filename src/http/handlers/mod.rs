//! Route handlers, one module per API area.

pub mod assets;
pub mod ipfs;
pub mod license;
pub mod register;
pub mod royalty;
pub mod status;
pub mod yakoa;
