use anyhow::Result;
use colored::Colorize;

use crate::lifecycle::status_report;

use super::common::{Exit, Locations, ProjectContext};

/// Per-stage counts, the next piece of work, and the violation count.
pub fn execute(locations: &Locations) -> Result<Exit> {
    let ctx = ProjectContext::load(locations)?;
    ctx.require_store()?;

    let report = status_report(&ctx.store)?;

    println!("{}", "Features".bold());
    println!("{}", "─".repeat(40).dimmed());
    for (stage, count) in &report.counts {
        let count = if *count == 0 {
            count.to_string().dimmed()
        } else {
            count.to_string().bold()
        };
        println!("  {:<10} {}", stage.to_string(), count);
    }
    println!();

    match &report.pending {
        Some(work) => println!(
            "{} Next: {} {} ({})",
            "→".cyan().bold(),
            work.record_id.to_string().bold(),
            work.title,
            work.stage
        ),
        None => println!("{} No pending work", "✓".green().bold()),
    }

    if !report.violations.is_empty() {
        println!(
            "{} {} consistency violation(s); run {} for details",
            "✗".red().bold(),
            report.violations.len(),
            "shepherd check".cyan()
        );
    }

    Ok(Exit::Proceed)
}
