#![allow(dead_code)]
//! Shared test utilities for integration tests.
//!
//! - fixture paths and loaders for the `tests/fixtures` module maps and batches
//! - [`GatedMetadataService`], a metadata source whose responses are released
//!   by the test, for exercising out-of-order fetch completion

use anyhow::{anyhow, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::oneshot;

use sui_ptb_types::address::normalize_address;
use sui_ptb_types::{Batch, NormalizedModules};
use sui_transport::{InMemoryMetadataService, MetadataService};

/// Package ID the counter fixture is registered under.
pub const COUNTER_PACKAGE: &str = "0xc0ffee";

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn counter_modules() -> NormalizedModules {
    let json = std::fs::read_to_string(fixture_path("counter_modules.json"))
        .expect("counter fixture should exist");
    let value: serde_json::Value = serde_json::from_str(&json).expect("fixture is valid JSON");
    sui_transport::jsonrpc::parse_normalized_modules(value).expect("fixture parses")
}

/// In-memory service serving the counter fixture.
pub fn counter_service() -> InMemoryMetadataService {
    InMemoryMetadataService::new().with_package(COUNTER_PACKAGE, counter_modules())
}

pub fn load_batch(name: &str) -> Batch {
    let json = std::fs::read_to_string(fixture_path(name)).expect("batch fixture should exist");
    serde_json::from_str(&json).expect("batch fixture parses")
}

/// Metadata service whose fetches stay pending until the test releases them.
#[derive(Default)]
pub struct GatedMetadataService {
    gates: Mutex<HashMap<String, oneshot::Receiver<NormalizedModules>>>,
}

impl GatedMetadataService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold the next fetch of `package_id` until the sender fires.
    /// Dropping the sender fails the fetch.
    pub fn gate(&self, package_id: &str) -> oneshot::Sender<NormalizedModules> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().insert(normalize_address(package_id), rx);
        tx
    }
}

#[async_trait::async_trait]
impl MetadataService for GatedMetadataService {
    async fn get_normalized_modules(&self, package_id: &str) -> Result<NormalizedModules> {
        let gate = self.gates.lock().remove(&normalize_address(package_id));
        let Some(gate) = gate else {
            return Err(anyhow!("Package {} not found", package_id));
        };
        gate.await
            .map_err(|_| anyhow!("Fetch of package {} was abandoned", package_id))
    }
}
