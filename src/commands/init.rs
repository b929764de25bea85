use anyhow::Result;
use colored::Colorize;

use super::common::{Exit, Locations, ProjectContext};

/// Create the feature store and its stage directories.
pub fn execute(locations: &Locations) -> Result<Exit> {
    let ctx = ProjectContext::load(locations)?;
    let created = ctx.store.initialize()?;

    if created.is_empty() {
        println!(
            "{} Feature store already initialized at {}",
            "✓".green().bold(),
            ctx.store.root().display().to_string().dimmed()
        );
    } else {
        for dir in &created {
            println!("  {} {}", "✓".green().bold(), dir.display().to_string().dimmed());
        }
        println!(
            "\n{} Feature store ready at {}",
            "✓".green().bold(),
            ctx.store.root().display()
        );
        println!(
            "  Add a feature with {}",
            "shepherd new \"<title>\" --file <path>".cyan()
        );
    }

    Ok(Exit::Proceed)
}
