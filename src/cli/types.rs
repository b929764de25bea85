use clap::{Args, Parser, Subcommand};
use shepherd::models::stage::Stage;
use shepherd::validation::{clap_path_validator, clap_record_id_validator, clap_stage_validator};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shepherd")]
#[command(about = "Filesystem-backed feature lifecycle for multi-agent development", long_about = None)]
#[command(version)]
#[command(subcommand_help_heading = "Commands")]
pub struct Cli {
    #[command(flatten)]
    pub locations: LocationArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct LocationArgs {
    /// Project root (default: current directory)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    /// Feature store root, relative to the project root unless absolute
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the feature store and its stage directories
    Init,

    /// Add a feature record to ready/
    New {
        /// Feature title
        title: String,

        /// Repository-relative file the feature will modify (repeatable)
        #[arg(short, long = "file", value_parser = clap_path_validator)]
        files: Vec<String>,

        /// Free-form body text for the record
        #[arg(short, long, default_value = "")]
        body: String,
    },

    /// Check consistency, warn about stuck records, and print the next directive
    ///
    /// Exits 2 when any record's status disagrees with its directory.
    Next,

    /// Scan every record for status/location mismatches (exit 2 on violations)
    Check,

    /// Check whether in-flight records already claim the given files (exit 1 on conflicts)
    Claim {
        /// Record id (e.g. 7 or 007)
        #[arg(value_parser = clap_record_id_validator)]
        id: String,

        /// Files the record wants to modify
        #[arg(required = true, value_parser = clap_path_validator)]
        files: Vec<String>,
    },

    /// Move a record to another stage
    ///
    /// Leaving building or completing review runs the full gate first.
    Advance {
        /// Record id (e.g. 7 or 007)
        #[arg(value_parser = clap_record_id_validator)]
        id: String,

        /// Target stage: ready, testing, building, review, completed
        #[arg(value_parser = clap_stage_validator)]
        to: Stage,
    },

    /// Run the quality gate (exit 2 on failure, 1 when tooling is missing)
    Gate {
        /// Run the complete battery instead of static checks only
        #[arg(long)]
        full: bool,
    },

    /// List records sitting in building past the stuck threshold
    Stuck,

    /// Classify a shell command before it runs (exit 2 on reject)
    Guard {
        /// Read a tool-call JSON payload from stdin
        #[arg(long, conflicts_with = "print_config")]
        hook: bool,

        /// Print hook settings that route shell tool calls through the guard
        #[arg(long)]
        print_config: bool,

        /// The command line to classify
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Show per-stage counts and the next piece of work
    Status,
}
