use anyhow::Result;
use colored::Colorize;

use crate::lifecycle::{consistency_scan, Violation};

use super::common::{Exit, Locations, ProjectContext};

/// Full consistency scan. Any violation blocks.
pub fn execute(locations: &Locations) -> Result<Exit> {
    let ctx = ProjectContext::load(locations)?;
    ctx.require_store()?;

    let violations = consistency_scan(&ctx.store)?;
    if violations.is_empty() {
        println!("{} All records consistent", "✓".green().bold());
        return Ok(Exit::Proceed);
    }

    print_violations(&violations);
    Ok(Exit::Block)
}

pub(crate) fn print_violations(violations: &[Violation]) {
    eprintln!(
        "{} {} consistency violation(s):",
        "✗".red().bold(),
        violations.len()
    );
    for violation in violations {
        eprintln!(
            "  {} record {} in {}/ declares status: {}",
            "✗".red(),
            violation.record_id.to_string().bold(),
            violation.location,
            violation.declared.red()
        );
        eprintln!("    {}", violation.remedy().dimmed());
    }
}
