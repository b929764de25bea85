//! Pre-tool-use hook integration for the command guard

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};

/// The only tool whose input is a shell command.
pub const SHELL_TOOL_NAME: &str = "Bash";

/// Tool-call payload delivered on stdin by the agent harness.
#[derive(Debug, Clone, Deserialize)]
pub struct HookPayload {
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: Value,
}

impl HookPayload {
    pub fn parse(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("Failed to parse hook payload as JSON")
    }

    /// The shell command to classify, or `None` for other tools.
    pub fn command(&self) -> Option<&str> {
        if self.tool_name != SHELL_TOOL_NAME {
            return None;
        }
        self.tool_input.get("command").and_then(Value::as_str)
    }
}

/// Hook settings that route every shell tool call through `guard_command_line`.
pub fn guard_hook_config(guard_command_line: &str) -> Value {
    json!({
        "PreToolUse": [
            {
                "matcher": SHELL_TOOL_NAME,
                "hooks": [
                    {
                        "type": "command",
                        "command": guard_command_line
                    }
                ]
            }
        ]
    })
}
