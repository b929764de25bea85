//! Read-only git queries.

pub mod runner;

pub use runner::{current_branch, run_git, run_git_checked};
