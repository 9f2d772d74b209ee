//! Output formatting for ptb-builder CLI

use anyhow::Result;
use serde::Serialize;

use sui_ptb_builder::{Projection, ReadinessReport};
use sui_ptb_types::{Argument, TypeParameterBinding};

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format a readiness report for display
pub fn format_readiness(report: &ReadinessReport) -> String {
    let mut out = String::new();

    if report.is_ready() {
        out.push_str("\x1b[32m✓ Batch is ready\x1b[0m\n");
    } else {
        out.push_str(&format!(
            "\x1b[31m✗ Batch is not ready ({} issues)\x1b[0m\n",
            report.issues.len()
        ));
        for issue in &report.issues {
            out.push_str(&format!(
                "  step {} {}: [{}] {}\n",
                issue.step, issue.field, issue.kind, issue.message
            ));
        }
    }

    if !report.warnings.is_empty() {
        out.push_str("\x1b[33mWarnings:\x1b[0m\n");
        for warning in &report.warnings {
            out.push_str(&format!("  {}\n", warning));
        }
    }
    out
}

fn format_binding(index: usize, binding: &TypeParameterBinding) -> String {
    if binding.abilities.is_empty() {
        format!("T{}", index)
    } else {
        format!("T{}: {}", index, binding.abilities)
    }
}

fn format_argument(index: usize, argument: &Argument) -> String {
    let declared = argument
        .declared_type
        .as_ref()
        .map(|t| t.canonical_name())
        .unwrap_or_default();
    format!("[{}] {:<6} {}", index, argument.kind, declared)
}

/// Format a projected call for display
pub fn format_projection(target: &str, projection: &Projection) -> String {
    let mut out = format!("\x1b[1m{}\x1b[0m\n", target);

    if !projection.type_arguments.is_empty() {
        out.push_str("Type parameters:\n");
        for (i, binding) in projection.type_arguments.iter().enumerate() {
            out.push_str(&format!("  {}\n", format_binding(i, binding)));
        }
    }

    out.push_str("Arguments:\n");
    if projection.arguments.is_empty() {
        out.push_str("  (none)\n");
    }
    for (i, argument) in projection.arguments.iter().enumerate() {
        out.push_str(&format!("  {}\n", format_argument(i, argument)));
    }

    if !projection.returns.is_empty() {
        out.push_str("Returns:\n");
        for ret in &projection.returns {
            out.push_str(&format!("  {}\n", ret));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sui_ptb_types::{Ability, AbilitySet, TypeDescriptor};

    #[test]
    fn test_format_binding() {
        let binding =
            TypeParameterBinding::unbound(AbilitySet::new(vec![Ability::Copy, Ability::Drop]));
        assert_eq!(format_binding(1, &binding), "T1: copy, drop");
    }

    #[test]
    fn test_format_argument() {
        let arg = Argument::for_parameter(TypeDescriptor::scalar("U64"));
        assert_eq!(format_argument(0, &arg), "[0] Pure   U64");
    }
}
