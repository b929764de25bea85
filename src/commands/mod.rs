//! Command handlers, one module per subcommand.

pub mod advance;
pub mod check;
pub mod claim;
pub mod common;
pub mod gate;
pub mod guard;
pub mod init;
pub mod new;
pub mod next;
pub mod status;
pub mod stuck;

pub use common::{exit_for_error, Exit, Locations, ProjectContext};
