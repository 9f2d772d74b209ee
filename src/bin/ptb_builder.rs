//! ptb-builder: compose and check Sui programmable transaction blocks
//!
//! ## Features
//!
//! - **functions**: list the public functions of a package
//! - **project**: show the argument placeholders a function call needs
//! - **check**: report what keeps a saved batch from executing
//! - **lower**: convert a ready batch into a PTB JSON spec
//!
//! ## Example Usage
//!
//! ```bash
//! # List public functions of the framework coin module
//! ptb-builder functions 0x2 --module coin
//!
//! # Project a function signature into arguments
//! ptb-builder project 0x2::coin::split --json
//!
//! # Check and lower a batch saved as JSON
//! ptb-builder check batch.json
//! ptb-builder lower batch.json > ptb.json
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod builder_cli;

use builder_cli::{
    check::CheckCmd, functions::FunctionsCmd, lower::LowerCmd, project::ProjectCmd, CliContext,
};
use sui_transport::Network;

#[derive(Parser)]
#[command(
    name = "ptb-builder",
    author,
    version,
    about = "Compose and check Sui programmable transaction blocks",
    long_about = "Inspect package functions, project call signatures into arguments, \
                  and check or lower step-by-step transaction batches."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Fullnode JSON-RPC URL (default: SUI_RPC_URL or the testnet fullnode)
    #[arg(long, global = true, conflicts_with = "network")]
    rpc_url: Option<String>,

    /// Use the public fullnode of a network (mainnet, testnet, devnet)
    #[arg(long, global = true)]
    network: Option<Network>,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (debug logging)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List public functions of a package
    Functions(FunctionsCmd),

    /// Project a function signature into type parameters and arguments
    Project(ProjectCmd),

    /// Check whether a batch is ready to execute
    Check(CheckCmd),

    /// Lower a ready batch into a PTB JSON spec
    Lower(LowerCmd),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        command,
        rpc_url,
        network,
        json,
        verbose,
    } = Cli::parse();
    init_tracing(verbose);

    let ctx = CliContext::new(rpc_url, network, json, verbose);

    match command {
        Commands::Functions(cmd) => cmd.execute(&ctx).await,
        Commands::Project(cmd) => cmd.execute(&ctx).await,
        Commands::Check(cmd) => cmd.execute(&ctx),
        Commands::Lower(cmd) => cmd.execute(&ctx),
    }
}
