//! Sui Transport Layer
//!
//! Fetches package metadata for the PTB builder.
//!
//! This crate provides:
//! - [`MetadataService`]: the async seam the builder session talks to
//! - [`jsonrpc`]: a fullnode JSON-RPC client (`sui_getNormalizedMoveModulesByPackage`)
//! - [`memory`]: an in-memory service for tests and offline use
//! - [`network`]: well-known networks and their endpoints
//!
//! # Example
//!
//! ```ignore
//! use sui_transport::{JsonRpcClient, MetadataService};
//!
//! let client = JsonRpcClient::testnet();
//! let modules = client.get_normalized_modules("0x2").await?;
//! for (name, module) in &modules {
//!     println!("{} exposes {} functions", name, module.exposed_functions.len());
//! }
//! ```

use anyhow::Result;
use sui_ptb_types::NormalizedModules;

pub mod jsonrpc;
pub mod memory;
pub mod network;

pub use jsonrpc::JsonRpcClient;
pub use memory::InMemoryMetadataService;
pub use network::{infer_network_from_url, Network};

/// Source of normalized package metadata.
///
/// Implementations may block on the network; callers await the result and
/// must tolerate responses arriving after the user has moved on.
#[async_trait::async_trait]
pub trait MetadataService: Send + Sync {
    /// All modules of `package_id`, keyed by module name.
    async fn get_normalized_modules(&self, package_id: &str) -> Result<NormalizedModules>;
}

#[async_trait::async_trait]
impl<T: MetadataService + ?Sized> MetadataService for std::sync::Arc<T> {
    async fn get_normalized_modules(&self, package_id: &str) -> Result<NormalizedModules> {
        (**self).get_normalized_modules(package_id).await
    }
}
