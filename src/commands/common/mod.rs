//! Shared plumbing for command handlers: locating the project, loading
//! config, and mapping outcomes onto exit codes.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::ShepherdConfig;
use crate::error::LifecycleError;
use crate::fs::DocumentStore;

/// How a command finished, as seen by an external scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// 0: proceed / allow
    Proceed,
    /// 1: non-blocking warning
    Warn,
    /// 2: block / reject
    Block,
}

impl Exit {
    pub fn code(self) -> u8 {
        match self {
            Exit::Proceed => 0,
            Exit::Warn => 1,
            Exit::Block => 2,
        }
    }
}

/// Exit code for a command that failed with an error: 2 when a blocking
/// lifecycle error is anywhere in the chain, 1 otherwise.
pub fn exit_for_error(err: &anyhow::Error) -> Exit {
    let blocking = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<LifecycleError>())
        .any(LifecycleError::is_blocking);
    if blocking {
        Exit::Block
    } else {
        Exit::Warn
    }
}

/// Global location flags shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct Locations {
    pub project: Option<PathBuf>,
    pub root: Option<PathBuf>,
}

/// Everything a handler needs about the project it runs against.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub project_root: PathBuf,
    pub config: ShepherdConfig,
    pub store: DocumentStore,
}

impl ProjectContext {
    /// Resolve the project root, load `shepherd.toml`, and open the store.
    ///
    /// `--root` beats the config file, which beats the default `features/`.
    pub fn load(locations: &Locations) -> Result<Self> {
        let project_root = match &locations.project {
            Some(path) => path.clone(),
            None => std::env::current_dir().context("Failed to read current directory")?,
        };
        let config = ShepherdConfig::load(&project_root)?;
        let store_root = match &locations.root {
            Some(root) => resolve_against(&project_root, root),
            None => config.store_root(&project_root),
        };

        tracing::debug!(
            project = %project_root.display(),
            store = %store_root.display(),
            "resolved project context"
        );

        Ok(Self {
            project_root,
            config,
            store: DocumentStore::new(store_root),
        })
    }

    /// Fail with a hint when the store has never been initialized.
    pub fn require_store(&self) -> Result<()> {
        if !self.store.exists() {
            anyhow::bail!(
                "No feature store at {}. Run `shepherd init` first.",
                self.store.root().display()
            );
        }
        Ok(())
    }
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
