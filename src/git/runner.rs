//! Git command runner
//!
//! Shepherd only ever reads from git: the guard needs the current branch.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::{Command, Output};

/// Run a git command in `repo_root` and return the raw output.
pub fn run_git(args: &[&str], repo_root: &Path) -> Result<Output> {
    Command::new("git")
        .args(args)
        .current_dir(repo_root)
        .output()
        .with_context(|| format!("Failed to execute: git {}", args.join(" ")))
}

/// Run a git command, bail with its stderr on failure, return trimmed stdout.
pub fn run_git_checked(args: &[&str], repo_root: &Path) -> Result<String> {
    let output = run_git(args, repo_root)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let cmd = args.first().unwrap_or(&"");
        bail!("git {cmd} failed: {}", stderr.trim());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// The checked-out branch name, or `None` outside a repository, on a
/// detached HEAD, or when git is not installed. Unborn branches count.
pub fn current_branch(repo_root: &Path) -> Option<String> {
    match run_git_checked(&["symbolic-ref", "--quiet", "--short", "HEAD"], repo_root) {
        Ok(branch) if !branch.is_empty() => Some(branch),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "could not determine current branch");
            None
        }
    }
}
