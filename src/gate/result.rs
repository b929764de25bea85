//! Result types for gate runs

use std::fmt;
use std::time::Duration;

/// Result of running one gate command
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub command: String,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub duration: Duration,
    /// Whether the command was killed for exceeding its timeout
    pub timed_out: bool,
}

impl CommandResult {
    pub fn summary(&self) -> String {
        let status = if self.timed_out {
            "TIMEOUT"
        } else if self.success {
            "PASSED"
        } else {
            "FAILED"
        };
        format!(
            "{} - {} ({}ms, exit code: {:?})",
            status,
            self.command,
            self.duration.as_millis(),
            self.exit_code
        )
    }

    /// stdout followed by stderr, skipping empty streams.
    pub fn combined_output(&self) -> String {
        [self.stdout.trim_end(), self.stderr.trim_end()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Outcome of a gate run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Pass { commands: Vec<String> },
    Fail { command: String, output: String },
    Skipped { reason: String },
    ToolingMissing { reason: String },
}

impl GateOutcome {
    /// 0 proceed, 2 block, 1 non-blocking warning.
    pub fn exit_code(&self) -> u8 {
        match self {
            GateOutcome::Pass { .. } | GateOutcome::Skipped { .. } => 0,
            GateOutcome::Fail { .. } => 2,
            GateOutcome::ToolingMissing { .. } => 1,
        }
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, GateOutcome::Fail { .. })
    }
}

impl fmt::Display for GateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateOutcome::Pass { commands } => {
                write!(f, "gate passed ({} command(s))", commands.len())
            }
            GateOutcome::Fail { command, .. } => write!(f, "gate failed: `{command}`"),
            GateOutcome::Skipped { reason } => write!(f, "gate skipped: {reason}"),
            GateOutcome::ToolingMissing { reason } => write!(f, "gate tooling missing: {reason}"),
        }
    }
}

/// Keep the first `max_lines` lines of `output`, noting how many were cut.
pub fn truncate_lines(output: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = output.lines().collect();
    if lines.len() <= max_lines {
        return output.trim_end().to_string();
    }

    let omitted = lines.len() - max_lines;
    let mut kept = lines[..max_lines].join("\n");
    kept.push_str(&format!("\n... ({omitted} more lines omitted)"));
    kept
}
