//! Project configuration from `shepherd.toml`
//!
//! Every key is optional. A missing file means defaults throughout.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fs::DEFAULT_STORE_DIR;
use crate::lifecycle::DEFAULT_STUCK_THRESHOLD_MINUTES;

pub const CONFIG_FILE_NAME: &str = "shepherd.toml";

/// Default timeout for a single gate command (5 minutes)
pub const DEFAULT_GATE_TIMEOUT_SECS: u64 = 300;

/// Default number of failure output lines handed back to the caller
pub const DEFAULT_MAX_OUTPUT_LINES: usize = 40;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShepherdConfig {
    pub store: StoreConfig,
    pub gate: GateConfig,
    pub stuck: StuckConfig,
    pub guard: GuardConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Store root, relative to the project root unless absolute
    pub root: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_STORE_DIR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    /// Commands for the fast gate. `None` means detect from manifests.
    pub fast: Option<Vec<String>>,
    /// Commands for the full gate. `None` means detect from manifests.
    pub full: Option<Vec<String>>,
    pub timeout_secs: u64,
    pub max_output_lines: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            fast: None,
            full: None,
            timeout_secs: DEFAULT_GATE_TIMEOUT_SECS,
            max_output_lines: DEFAULT_MAX_OUTPUT_LINES,
        }
    }
}

impl GateConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StuckConfig {
    pub threshold_minutes: u64,
}

impl Default for StuckConfig {
    fn default() -> Self {
        Self {
            threshold_minutes: DEFAULT_STUCK_THRESHOLD_MINUTES,
        }
    }
}

impl StuckConfig {
    pub fn threshold(&self) -> Duration {
        Duration::from_secs(self.threshold_minutes.saturating_mul(60))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardConfig {
    pub protected_branches: Vec<String>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            protected_branches: vec!["main".to_string(), "master".to_string()],
        }
    }
}

impl ShepherdConfig {
    /// Load `shepherd.toml` from `project_root`.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Absolute store root for `project_root`.
    pub fn store_root(&self, project_root: &Path) -> PathBuf {
        if self.store.root.is_absolute() {
            self.store.root.clone()
        } else {
            project_root.join(&self.store.root)
        }
    }
}
