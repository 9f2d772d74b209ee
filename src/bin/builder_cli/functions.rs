//! functions command - list the public functions of a package

use anyhow::{anyhow, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use sui_ptb_types::address::normalize_address_short;

use super::output::print_json;
use super::CliContext;

#[derive(Parser, Debug)]
pub struct FunctionsCmd {
    /// Package ID, e.g. 0x2
    pub package: String,

    /// Only list this module
    #[arg(long)]
    pub module: Option<String>,

    /// Read the module map from a JSON file instead of the network
    #[arg(long)]
    pub modules_file: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct FunctionEntry {
    module: String,
    name: String,
    is_entry: bool,
    signature: String,
}

impl FunctionsCmd {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let service = ctx.metadata_service(&self.package, self.modules_file.as_deref())?;
        let modules = service.get_normalized_modules(&self.package).await?;

        if let Some(module) = &self.module {
            if !modules.contains_key(module) {
                return Err(anyhow!(
                    "Module '{}' not found in package {}",
                    module,
                    normalize_address_short(&self.package)
                ));
            }
        }

        let entries: Vec<FunctionEntry> = modules
            .iter()
            .filter(|(name, _)| self.module.as_ref().map_or(true, |m| m == *name))
            .flat_map(|(module_name, module)| {
                module.public_functions().map(move |(name, f)| FunctionEntry {
                    module: module_name.clone(),
                    name: name.clone(),
                    is_entry: f.is_entry,
                    signature: f.signature(name),
                })
            })
            .collect();

        if ctx.json {
            return print_json(&entries);
        }

        let package = normalize_address_short(&self.package);
        if entries.is_empty() {
            println!("No public functions in {}", package);
            return Ok(());
        }
        let mut current = "";
        for entry in &entries {
            if entry.module != current {
                println!("\x1b[1m{}::{}\x1b[0m", package, entry.module);
                current = &entry.module;
            }
            let marker = if entry.is_entry { " [entry]" } else { "" };
            println!("  {}{}", entry.signature, marker);
        }
        Ok(())
    }
}
