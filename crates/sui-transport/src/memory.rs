//! In-memory metadata service.
//!
//! Packages are registered up front (from fixtures or a previous fetch) and
//! served without touching the network. Lookups normalize the package ID, so
//! `0x2` and its full 64-digit form hit the same entry.

use anyhow::{anyhow, Context, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use sui_ptb_types::address::{normalize_address, parse_address};
use sui_ptb_types::NormalizedModules;

use crate::jsonrpc::parse_normalized_modules;
use crate::MetadataService;

#[derive(Default)]
pub struct InMemoryMetadataService {
    packages: RwLock<HashMap<String, NormalizedModules>>,
    requests: AtomicUsize,
}

impl InMemoryMetadataService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `modules` under `package_id`, replacing any previous entry.
    pub fn insert(&self, package_id: &str, modules: NormalizedModules) {
        self.packages
            .write()
            .insert(normalize_address(package_id), modules);
    }

    pub fn with_package(self, package_id: &str, modules: NormalizedModules) -> Self {
        self.insert(package_id, modules);
        self
    }

    /// Register a package from a JSON module map, in the shape returned by
    /// `sui_getNormalizedMoveModulesByPackage`.
    pub fn insert_json(&self, package_id: &str, json: &str) -> Result<()> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let modules = parse_normalized_modules(value)?;
        self.insert(package_id, modules);
        Ok(())
    }

    /// Register a package from a JSON file on disk.
    pub fn load_file(&self, package_id: &str, path: &Path) -> Result<()> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read module metadata from {}", path.display()))?;
        self.insert_json(package_id, &json)
            .with_context(|| format!("Invalid module metadata in {}", path.display()))
    }

    /// Number of lookups served so far, hits and misses alike.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl MetadataService for InMemoryMetadataService {
    async fn get_normalized_modules(&self, package_id: &str) -> Result<NormalizedModules> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        if parse_address(package_id).is_none() {
            return Err(anyhow!("Invalid package ID '{}'", package_id));
        }
        self.packages
            .read()
            .get(&normalize_address(package_id))
            .cloned()
            .ok_or_else(|| anyhow!("Package {} not found", package_id))
    }
}
