//! Shell execution for gate commands

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

use super::result::CommandResult;

/// Timeout for collecting output from child process pipes
const OUTPUT_COLLECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum captured output per stream (10MB)
const MAX_OUTPUT_SIZE: usize = 10 * 1024 * 1024;

/// Runs gate commands. Swapped out in tests to observe whether the gate
/// invoked anything at all.
pub trait CommandRunner {
    /// Whether `program` can be found on `PATH`.
    fn is_available(&self, program: &str) -> bool;

    fn run(&self, command: &str, working_dir: &Path, timeout: Duration) -> Result<CommandResult>;
}

/// Runs commands through the system shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    fn run(&self, command: &str, working_dir: &Path, timeout: Duration) -> Result<CommandResult> {
        run_command_with_timeout(command, Some(working_dir), timeout)
    }
}

/// The program a shell command line starts with, skipping leading
/// `NAME=value` environment assignments.
pub fn program_of(command: &str) -> Option<&str> {
    command
        .split_whitespace()
        .find(|token| !is_env_assignment(token))
}

fn is_env_assignment(token: &str) -> bool {
    match token.split_once('=') {
        Some((name, _)) => {
            !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    }
}

/// Run a shell command, killing it after `timeout`.
///
/// Output is drained on reader threads while waiting, so a chatty command
/// cannot fill the pipe buffer and deadlock.
pub fn run_command_with_timeout(
    command: &str,
    working_dir: Option<&Path>,
    timeout: Duration,
) -> Result<CommandResult> {
    let start = Instant::now();
    let mut child = spawn_shell_command(command, working_dir)?;

    let (stdout_tx, stdout_rx) = mpsc::channel();
    let (stderr_tx, stderr_rx) = mpsc::channel();

    match child.stdout.take() {
        Some(stdout) => {
            thread::spawn(move || {
                let _ = stdout_tx.send(read_stream_to_string(stdout));
            });
        }
        None => {
            let _ = stdout_tx.send(String::new());
        }
    }

    match child.stderr.take() {
        Some(stderr) => {
            thread::spawn(move || {
                let _ = stderr_tx.send(read_stream_to_string(stderr));
            });
        }
        None => {
            let _ = stderr_tx.send(String::new());
        }
    }

    let wait_result = child
        .wait_timeout(timeout)
        .with_context(|| format!("Failed to wait for command: {command}"))?;

    if wait_result.is_none() {
        kill_child_process(&mut child);
    }

    let duration = start.elapsed();
    let stdout = stdout_rx
        .recv_timeout(OUTPUT_COLLECTION_TIMEOUT)
        .unwrap_or_else(|_| "[output collection timed out]".to_string());
    let stderr = stderr_rx
        .recv_timeout(OUTPUT_COLLECTION_TIMEOUT)
        .unwrap_or_else(|_| "[output collection timed out]".to_string());

    let result = match wait_result {
        Some(status) => CommandResult {
            command: command.to_string(),
            success: status.success(),
            stdout,
            stderr,
            exit_code: status.code(),
            duration,
            timed_out: false,
        },
        None => CommandResult {
            command: command.to_string(),
            success: false,
            stdout,
            stderr: format!(
                "{stderr}\n[Process killed after {}s timeout]",
                timeout.as_secs()
            ),
            exit_code: None,
            duration,
            timed_out: true,
        },
    };

    tracing::debug!(summary = %result.summary(), "gate command finished");
    Ok(result)
}

fn spawn_shell_command(command: &str, working_dir: Option<&Path>) -> Result<Child> {
    let mut cmd = if cfg!(target_family = "unix") {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    } else {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    };

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    cmd.spawn()
        .with_context(|| format!("Failed to spawn command: {command}"))
}

/// Read a stream to a string, keeping at most MAX_OUTPUT_SIZE bytes and
/// draining the rest so the child never sees a broken pipe.
fn read_stream_to_string<R: Read>(mut stream: R) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    let mut truncated = false;

    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                let remaining = MAX_OUTPUT_SIZE.saturating_sub(buf.len());
                let to_copy = n.min(remaining);
                buf.extend_from_slice(&chunk[..to_copy]);
                if to_copy < n {
                    truncated = true;
                    while stream.read(&mut chunk).unwrap_or(0) > 0 {}
                    break;
                }
            }
            Err(_) => {
                if buf.is_empty() {
                    return "[error reading output]".to_string();
                }
                break;
            }
        }
    }

    if truncated {
        buf.extend_from_slice(b"\n[output truncated at 10MB]");
    }
    String::from_utf8_lossy(&buf).to_string()
}

/// Kill a child and reap it. Errors are ignored since it may already be gone.
fn kill_child_process(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
