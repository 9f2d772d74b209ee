//! project command - show the arguments a function call needs

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde_json::json;
use std::path::PathBuf;

use sui_ptb_builder::{BuilderSession, Projection};
use sui_ptb_types::{Step, StepKind};

use super::output::{format_projection, print_json};
use super::CliContext;

#[derive(Parser, Debug)]
pub struct ProjectCmd {
    /// Target function: "0xPACKAGE::module::function"
    pub target: String,

    /// Read the module map from a JSON file instead of the network
    #[arg(long)]
    pub modules_file: Option<PathBuf>,
}

fn split_target(target: &str) -> Result<(&str, &str, &str)> {
    let mut parts = target.split("::");
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(package), Some(module), Some(function), None)
            if !package.is_empty() && !module.is_empty() && !function.is_empty() =>
        {
            Ok((package, module, function))
        }
        _ => Err(anyhow!(
            "Invalid target '{}': expected PACKAGE::MODULE::FUNCTION",
            target
        )),
    }
}

impl ProjectCmd {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let (package, module, function) = split_target(&self.target)?;
        let service = ctx.metadata_service(package, self.modules_file.as_deref())?;

        let mut session = BuilderSession::new();
        let index = session.add_step(StepKind::MoveCall);
        let ticket = session.begin_package_change(index, package)?;
        let modules = service
            .get_normalized_modules(&ticket.package_id)
            .await
            .with_context(|| format!("Failed to load package {}", package))?;
        session.apply_modules(ticket, Ok(modules));

        if !session.select_module(index, module)? {
            return Err(anyhow!("Module '{}' not found in package {}", module, package));
        }
        if !session.select_function(index, function)? {
            return Err(anyhow!(
                "Function '{}' is not a public function of {}::{}",
                function,
                package,
                module
            ));
        }

        let Some(Step::MoveCall(call)) = session.step(index) else {
            return Err(anyhow!("Step {} is not a MoveCall", index));
        };
        let projection = Projection {
            type_arguments: call.type_arguments.clone(),
            arguments: call.arguments.clone(),
            returns: session.returns(index).to_vec(),
        };

        if ctx.json {
            print_json(&json!({
                "package": package,
                "module": module,
                "function": function,
                "type_arguments": projection.type_arguments,
                "arguments": projection.arguments,
                "returns": projection.returns,
            }))
        } else {
            print!("{}", format_projection(&self.target, &projection));
            Ok(())
        }
    }
}
