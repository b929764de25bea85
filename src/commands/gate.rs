use anyhow::Result;
use colored::Colorize;

use crate::gate::{run_gate, GateKind, GateOutcome};

use super::common::{Exit, Locations, ProjectContext};

/// Run the fast (default) or full gate.
pub fn execute(locations: &Locations, full: bool) -> Result<Exit> {
    let ctx = ProjectContext::load(locations)?;
    let kind = if full { GateKind::Full } else { GateKind::Fast };

    let outcome = run_gate(&ctx.store, &ctx.project_root, kind, &ctx.config.gate)?;
    print_outcome(&outcome);
    Ok(exit_for(&outcome))
}

pub(crate) fn exit_for(outcome: &GateOutcome) -> Exit {
    match outcome.exit_code() {
        0 => Exit::Proceed,
        2 => Exit::Block,
        _ => Exit::Warn,
    }
}

pub(crate) fn print_outcome(outcome: &GateOutcome) {
    match outcome {
        GateOutcome::Pass { commands } => {
            for command in commands {
                println!("  {} {}", "✓".green(), command.dimmed());
            }
            println!("{} {}", "✓".green().bold(), outcome);
        }
        GateOutcome::Skipped { .. } => println!("{} {}", "→".cyan().bold(), outcome),
        GateOutcome::ToolingMissing { .. } => {
            eprintln!("{} {}", "⚠".yellow().bold(), outcome.to_string().yellow())
        }
        GateOutcome::Fail { output, .. } => {
            eprintln!("{} {}", "✗".red().bold(), outcome.to_string().red());
            if !output.is_empty() {
                eprintln!("{output}");
            }
        }
    }
}
