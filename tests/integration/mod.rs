//! End-to-end tests for the feature lifecycle, gate, guard and CLI.

pub mod cli_exit_codes;
pub mod gate_and_guard;
pub mod helpers;
pub mod lifecycle_flow;
