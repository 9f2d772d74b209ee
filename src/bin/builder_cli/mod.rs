//! CLI subcommand implementations for ptb-builder

pub mod check;
pub mod functions;
pub mod lower;
pub mod output;
pub mod project;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use sui_ptb_builder::BuilderConfig;
use sui_ptb_types::Batch;
use sui_transport::{InMemoryMetadataService, MetadataService, Network};

/// Global flags shared by every subcommand.
pub struct CliContext {
    pub config: BuilderConfig,
    pub json: bool,
    pub verbose: bool,
}

impl CliContext {
    pub fn new(
        rpc_url: Option<String>,
        network: Option<Network>,
        json: bool,
        verbose: bool,
    ) -> Self {
        let config = match (rpc_url, network) {
            (Some(url), _) => BuilderConfig::from_env().with_rpc_url(url),
            (None, Some(network)) => {
                let env = BuilderConfig::from_env();
                BuilderConfig {
                    timeout: env.timeout,
                    connect_timeout: env.connect_timeout,
                    ..BuilderConfig::network(network)
                }
            }
            (None, None) => BuilderConfig::from_env(),
        };
        Self {
            config,
            json,
            verbose,
        }
    }

    /// Metadata source for `package`: a local module map when given, the
    /// configured fullnode otherwise.
    pub fn metadata_service(
        &self,
        package: &str,
        modules_file: Option<&Path>,
    ) -> Result<Box<dyn MetadataService>> {
        match modules_file {
            Some(path) => {
                let service = InMemoryMetadataService::new();
                service.load_file(package, path)?;
                Ok(Box::new(service))
            }
            None => {
                let network = self
                    .config
                    .network_name()
                    .map_or("custom", |n| n.as_str());
                info!(rpc_url = %self.config.rpc_url, network, "fetching modules over RPC");
                Ok(Box::new(self.config.client()))
            }
        }
    }
}

/// Read a batch from a JSON file, or stdin when the path is `-`.
pub fn read_batch(path: &Path) -> Result<Batch> {
    let json_str = if path.as_os_str() == "-" {
        use std::io::Read;
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read batch file: {}", path.display()))?
    };

    serde_json::from_str(&json_str).context("Failed to parse batch JSON")
}
