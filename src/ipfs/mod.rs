//! IPFS pinning through Pinata, plus gateway URL helpers.

pub mod gateway;
pub mod metadata;
pub mod pinata;

pub use gateway::{gateway_url, ipfs_uri};
pub use metadata::{AssetMetadata, MetadataRequest};
pub use pinata::{PinataClient, PinataError, Upload};
