use anyhow::{Context, Result};
use colored::Colorize;

use crate::error::LifecycleError;
use crate::gate::{run_gate, GateKind, GateOutcome};
use crate::lifecycle::transition;
use crate::models::record::RecordId;
use crate::models::stage::Stage;

use super::common::{Exit, Locations, ProjectContext};
use super::gate::print_outcome;

/// Whether moving `from -> to` leaves building or marks work complete.
pub fn requires_full_gate(from: Stage, to: Stage) -> bool {
    matches!(
        (from, to),
        (Stage::Building, Stage::Review) | (Stage::Review, Stage::Completed)
    )
}

/// Move record `id` to `to`, running the full gate first at completion
/// boundaries. A gate failure blocks; missing tooling only warns.
pub fn execute(locations: &Locations, id: RecordId, to: Stage) -> Result<Exit> {
    let ctx = ProjectContext::load(locations)?;
    ctx.require_store()?;

    let record = ctx
        .store
        .find_record(id)?
        .ok_or_else(|| LifecycleError::RecordNotFound {
            id,
            stage: "any stage".to_string(),
        })?;
    let from = record.location;
    from.try_transition(id, to)?;

    if requires_full_gate(from, to) {
        println!(
            "{} Running full gate before {} -> {}",
            "→".cyan().bold(),
            from,
            to
        );
        let outcome = run_gate(&ctx.store, &ctx.project_root, GateKind::Full, &ctx.config.gate)?;
        print_outcome(&outcome);
        if let GateOutcome::Fail { .. } = outcome {
            eprintln!(
                "{} Record {} stays in {}/. Fix the failures and retry.",
                "✗".red().bold(),
                id,
                from
            );
            return Ok(Exit::Block);
        }
    }

    let outcome = transition(&ctx.store, id, from, to)
        .with_context(|| format!("Failed to advance record {id}"))?;

    println!(
        "{} Record {} moved {} -> {} {}",
        "✓".green().bold(),
        id.to_string().bold(),
        from,
        to.to_string().green(),
        outcome.to_path.display().to_string().dimmed()
    );
    Ok(Exit::Proceed)
}
