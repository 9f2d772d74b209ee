//! JSON-RPC client for Sui fullnodes.
//!
//! Only the metadata call the builder needs is wrapped:
//! `sui_getNormalizedMoveModulesByPackage`, which returns every module of a
//! package with its exposed function signatures.
//!
//! Timeouts come from `SUI_RPC_TIMEOUT_SECS` and
//! `SUI_RPC_CONNECT_TIMEOUT_SECS` unless set explicitly.

use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use sui_ptb_types::address::{normalize_address, parse_address};
use sui_ptb_types::env_utils::env_var_or;
use sui_ptb_types::NormalizedModules;

use crate::network::Network;
use crate::MetadataService;

/// Blocking JSON-RPC client; the async [`MetadataService`] impl runs it on
/// the blocking pool.
#[derive(Clone)]
pub struct JsonRpcClient {
    endpoint: String,
    agent: ureq::Agent,
}

impl JsonRpcClient {
    /// Default request timeout in seconds (can be overridden by env).
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Default connect timeout in seconds (can be overridden by env).
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    pub fn default_timeouts() -> (Duration, Duration) {
        (
            Duration::from_secs(env_var_or(
                "SUI_RPC_TIMEOUT_SECS",
                Self::DEFAULT_TIMEOUT_SECS,
            )),
            Duration::from_secs(env_var_or(
                "SUI_RPC_CONNECT_TIMEOUT_SECS",
                Self::DEFAULT_CONNECT_TIMEOUT_SECS,
            )),
        )
    }

    fn build_agent(timeout: Duration, connect_timeout: Duration) -> ureq::Agent {
        ureq::AgentBuilder::new()
            .timeout(timeout)
            .timeout_connect(connect_timeout)
            .build()
    }

    pub fn mainnet() -> Self {
        Self::for_network(Network::Mainnet)
    }

    pub fn testnet() -> Self {
        Self::for_network(Network::Testnet)
    }

    pub fn devnet() -> Self {
        Self::for_network(Network::Devnet)
    }

    pub fn for_network(network: Network) -> Self {
        Self::new(network.rpc_url())
    }

    /// Create a client with a custom endpoint.
    pub fn new(endpoint: &str) -> Self {
        let (timeout, connect_timeout) = Self::default_timeouts();
        Self::with_timeouts(endpoint, timeout, connect_timeout)
    }

    /// Create a client with explicit timeouts.
    pub fn with_timeouts(endpoint: &str, timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            agent: Self::build_agent(timeout, connect_timeout),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute one JSON-RPC call and return its `result`.
    fn call(&self, method: &str, params: Value) -> Result<Value> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response: Value = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .send_json(&body)
            .map_err(|e| anyhow!("JSON-RPC request failed: {}", e))?
            .into_json()
            .map_err(|e| anyhow!("Failed to parse JSON-RPC response: {}", e))?;

        extract_result(response)
    }

    /// Fetch all modules of a package, blocking the current thread.
    pub fn fetch_normalized_modules(&self, package_id: &str) -> Result<NormalizedModules> {
        if parse_address(package_id).is_none() {
            return Err(anyhow!("Invalid package ID '{}'", package_id));
        }
        let package_id = normalize_address(package_id);
        debug!(endpoint = %self.endpoint, package = %package_id, "fetching normalized modules");
        let result = self.call(
            "sui_getNormalizedMoveModulesByPackage",
            serde_json::json!([package_id]),
        )?;
        parse_normalized_modules(result)
            .with_context(|| format!("Invalid module metadata for package {}", package_id))
    }
}

#[async_trait::async_trait]
impl MetadataService for JsonRpcClient {
    async fn get_normalized_modules(&self, package_id: &str) -> Result<NormalizedModules> {
        let client = self.clone();
        let package_id = package_id.to_string();
        tokio::task::spawn_blocking(move || client.fetch_normalized_modules(&package_id))
            .await
            .map_err(|e| anyhow!("Metadata fetch task failed: {}", e))?
    }
}

/// Pull `result` out of a JSON-RPC envelope, surfacing `error` as a failure.
fn extract_result(mut response: Value) -> Result<Value> {
    if let Some(error) = response.get("error") {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
        let msg = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(anyhow!("JSON-RPC error {}: {}", code, msg));
    }
    match response.get_mut("result") {
        Some(result) => Ok(result.take()),
        None => Err(anyhow!("No result in JSON-RPC response")),
    }
}

/// Decode the module map returned by `sui_getNormalizedMoveModulesByPackage`.
pub fn parse_normalized_modules(result: Value) -> Result<NormalizedModules> {
    if !result.is_object() {
        return Err(anyhow!("expected an object keyed by module name"));
    }
    Ok(serde_json::from_value(result)?)
}
