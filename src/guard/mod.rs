//! Pre-execution command guard.

pub mod hook;
pub mod rules;

pub use hook::{guard_hook_config, HookPayload, SHELL_TOOL_NAME};
pub use rules::{guard_command, split_segments, GuardContext, GuardRule, GuardVerdict};

use std::path::Path;

use crate::config::GuardConfig;
use crate::fs::DocumentStore;
use crate::git::current_branch;

/// Gather the guard context for a project: its branch, whether the store
/// exists, and the user's home directory.
pub fn detect_context(project_root: &Path, store: &DocumentStore, config: &GuardConfig) -> GuardContext {
    GuardContext {
        current_branch: current_branch(project_root),
        store_present: store.exists(),
        home_dir: dirs::home_dir(),
        protected_branches: config.protected_branches.clone(),
    }
}
