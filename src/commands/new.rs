use anyhow::{Context, Result};
use colored::Colorize;

use crate::lifecycle::{create_feature, OwnershipConflict};
use crate::validation::validate_title;

use super::common::{Exit, Locations, ProjectContext};

/// Create a record in `ready/`, warning about ownership overlaps.
pub fn execute(locations: &Locations, title: &str, files: &[String], body: &str) -> Result<Exit> {
    validate_title(title)?;
    let ctx = ProjectContext::load(locations)?;
    ctx.require_store()?;

    let (record, conflicts) = create_feature(&ctx.store, title, files, body)
        .with_context(|| format!("Failed to create feature '{title}'"))?;

    println!(
        "{} Created record {} {}",
        "✓".green().bold(),
        record.id.to_string().bold(),
        record.path.display().to_string().dimmed()
    );

    if !conflicts.is_empty() {
        println!();
        print_conflicts(&conflicts);
    }

    Ok(Exit::Proceed)
}

/// Print one warning line per conflicting path.
pub(crate) fn print_conflicts(conflicts: &[OwnershipConflict]) {
    for conflict in conflicts {
        println!(
            "{} {} is already claimed by record {} ({}, {})",
            "⚠".yellow().bold(),
            conflict.path.yellow(),
            conflict.other_id,
            conflict.other_title,
            conflict.other_status
        );
    }
}
