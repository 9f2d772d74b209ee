//! check command - report what keeps a batch from executing

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;

use sui_ptb_builder::check_readiness;

use super::output::{format_readiness, print_json};
use super::{read_batch, CliContext};

#[derive(Parser, Debug)]
pub struct CheckCmd {
    /// Batch JSON file (use '-' for stdin)
    pub batch: PathBuf,
}

impl CheckCmd {
    pub fn execute(&self, ctx: &CliContext) -> Result<()> {
        let batch = read_batch(&self.batch)?;
        let report = check_readiness(&batch);

        if ctx.json {
            print_json(&serde_json::json!({
                "ready": report.is_ready(),
                "steps": batch.len(),
                "issues": report.issues,
                "warnings": report.warnings,
            }))?;
        } else {
            print!("{}", format_readiness(&report));
        }

        if report.is_ready() {
            Ok(())
        } else {
            Err(anyhow!(
                "Batch is not ready: {} issue(s)",
                report.issues.len()
            ))
        }
    }
}
