use anyhow::Result;
use colored::Colorize;

use crate::lifecycle::{check_stuck, consistency_scan, find_pending_work, StuckRecord};

use super::check::print_violations;
use super::common::{Exit, Locations, ProjectContext};

/// Consistency scan, then stuck warnings, then the pending-work directive.
pub fn execute(locations: &Locations) -> Result<Exit> {
    let ctx = ProjectContext::load(locations)?;
    ctx.require_store()?;

    let violations = consistency_scan(&ctx.store)?;
    if !violations.is_empty() {
        print_violations(&violations);
        return Ok(Exit::Block);
    }

    let stuck = check_stuck(&ctx.store, ctx.config.stuck.threshold())?;
    print_stuck(&stuck);

    match find_pending_work(&ctx.store)? {
        Some(work) => {
            println!(
                "{} [{}] {} {}",
                "→".cyan().bold(),
                work.stage.to_string().cyan(),
                work.record_id.to_string().bold(),
                work.title
            );
            println!("{}", work.directive);
        }
        None => println!("{} No pending work", "✓".green().bold()),
    }

    Ok(Exit::Proceed)
}

pub(crate) fn print_stuck(stuck: &[StuckRecord]) {
    for record in stuck {
        println!("{} {}", "⚠".yellow().bold(), record.warning().yellow());
    }
}
