//! lower command - convert a ready batch into a PTB JSON spec

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use sui_ptb_builder::lower_batch;

use super::output::print_json;
use super::{read_batch, CliContext};

#[derive(Parser, Debug)]
pub struct LowerCmd {
    /// Batch JSON file (use '-' for stdin)
    pub batch: PathBuf,
}

impl LowerCmd {
    pub fn execute(&self, ctx: &CliContext) -> Result<()> {
        let batch = read_batch(&self.batch)?;
        let spec = lower_batch(&batch)?;
        if ctx.verbose && !ctx.json {
            eprintln!(
                "Lowered {} steps into {} inputs and {} commands",
                batch.len(),
                spec.inputs.len(),
                spec.commands.len()
            );
        }
        print_json(&spec)
    }
}
