use anyhow::Result;
use colored::Colorize;

use crate::lifecycle::check_stuck;

use super::common::{Exit, Locations, ProjectContext};
use super::next::print_stuck;

pub fn execute(locations: &Locations) -> Result<Exit> {
    let ctx = ProjectContext::load(locations)?;
    ctx.require_store()?;

    let stuck = check_stuck(&ctx.store, ctx.config.stuck.threshold())?;
    if stuck.is_empty() {
        println!(
            "{} Nothing in building for more than {} minutes",
            "✓".green().bold(),
            ctx.config.stuck.threshold_minutes
        );
    } else {
        print_stuck(&stuck);
    }

    Ok(Exit::Proceed)
}
