//! Builder configuration.
//!
//! Resolved from the environment, then overridden by CLI flags:
//!
//! - `SUI_RPC_URL` - fullnode JSON-RPC endpoint (default: testnet)
//! - `SUI_RPC_TIMEOUT_SECS` - request timeout (default: 30)
//! - `SUI_RPC_CONNECT_TIMEOUT_SECS` - connect timeout (default: 10)

use std::time::Duration;

use sui_ptb_types::env_utils::env_string_or;
use sui_transport::{infer_network_from_url, JsonRpcClient, Network};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    pub rpc_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self::network(Network::default())
    }
}

impl BuilderConfig {
    /// Public endpoint of `network` with default timeouts.
    pub fn network(network: Network) -> Self {
        Self {
            rpc_url: network.rpc_url().to_string(),
            timeout: Duration::from_secs(JsonRpcClient::DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(JsonRpcClient::DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Self {
        let (timeout, connect_timeout) = JsonRpcClient::default_timeouts();
        Self {
            rpc_url: env_string_or("SUI_RPC_URL", Network::default().rpc_url()),
            timeout,
            connect_timeout,
        }
    }

    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Public network the endpoint belongs to, guessed from its URL.
    pub fn network_name(&self) -> Option<Network> {
        infer_network_from_url(&self.rpc_url)
    }

    /// JSON-RPC client for this configuration.
    pub fn client(&self) -> JsonRpcClient {
        JsonRpcClient::with_timeouts(&self.rpc_url, self.timeout, self.connect_timeout)
    }
}
