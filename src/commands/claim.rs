use anyhow::Result;
use colored::Colorize;

use crate::lifecycle::check_ownership;
use crate::models::record::RecordId;

use super::common::{Exit, Locations, ProjectContext};
use super::new::print_conflicts;

/// Advisory ownership check for `files` on behalf of record `id`.
///
/// Conflicts are a warning (exit 1), never a block.
pub fn execute(locations: &Locations, id: RecordId, files: &[String]) -> Result<Exit> {
    let ctx = ProjectContext::load(locations)?;
    ctx.require_store()?;

    let conflicts = check_ownership(&ctx.store, Some(id), files)?;
    if conflicts.is_empty() {
        println!(
            "{} No in-flight record claims {} file(s) for record {}",
            "✓".green().bold(),
            files.len(),
            id
        );
        return Ok(Exit::Proceed);
    }

    print_conflicts(&conflicts);
    Ok(Exit::Warn)
}
