use anyhow::Result;
use shepherd::commands::{
    advance, check, claim, gate, guard, init, new, next, status, stuck, Exit, Locations,
};
use shepherd::models::record::RecordId;

use super::types::{Cli, Commands};

pub fn dispatch(cli: Cli) -> Result<Exit> {
    let locations = Locations {
        project: cli.locations.project,
        root: cli.locations.root,
    };

    match cli.command {
        Commands::Init => init::execute(&locations),
        Commands::New { title, files, body } => new::execute(&locations, &title, &files, &body),
        Commands::Next => next::execute(&locations),
        Commands::Check => check::execute(&locations),
        Commands::Claim { id, files } => claim::execute(&locations, id.parse::<RecordId>()?, &files),
        Commands::Advance { id, to } => advance::execute(&locations, id.parse::<RecordId>()?, to),
        Commands::Gate { full } => gate::execute(&locations, full),
        Commands::Stuck => stuck::execute(&locations),
        Commands::Guard {
            print_config: true, ..
        } => guard::print_hook_config(),
        Commands::Guard { hook, command, .. } => guard::execute(&locations, hook, &command),
        Commands::Status => status::execute(&locations),
    }
}
