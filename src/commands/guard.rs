use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::io::Read;

use crate::guard::{detect_context, guard_command, guard_hook_config, GuardVerdict, HookPayload};

use super::common::{Exit, Locations, ProjectContext};

/// Classify a command given on the command line or, with `hook`, a tool-call
/// payload on stdin. Rejections go to stderr so a hook caller relays them.
pub fn execute(locations: &Locations, hook: bool, command: &[String]) -> Result<Exit> {
    let ctx = ProjectContext::load(locations)?;

    let command = if hook {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read hook payload from stdin")?;
        match HookPayload::parse(&input)?.command() {
            Some(command) => command.to_string(),
            None => return Ok(Exit::Proceed),
        }
    } else if command.is_empty() {
        bail!("No command given. Pass the command to check, or use --hook");
    } else {
        command.join(" ")
    };

    let guard_ctx = detect_context(&ctx.project_root, &ctx.store, &ctx.config.guard);
    let verdict = guard_command(&command, &guard_ctx);

    match &verdict {
        GuardVerdict::Allow => {
            tracing::debug!(%command, "guard allowed command");
            if !hook {
                println!("{} allowed", "✓".green().bold());
            }
            Ok(Exit::Proceed)
        }
        GuardVerdict::Reject { rule, reason } => {
            tracing::warn!(%command, %rule, "guard rejected command");
            eprintln!("{} Blocked ({rule}): {reason}", "✗".red().bold());
            Ok(Exit::Block)
        }
    }
}

/// Print hook settings that route shell tool calls through the guard.
pub fn print_hook_config() -> Result<Exit> {
    let config = guard_hook_config("shepherd guard --hook");
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(Exit::Proceed)
}
