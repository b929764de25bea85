//! Exit codes of the `shepherd` binary: 0 proceed, 2 block, 1 warning

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn shepherd(project: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shepherd"))
        .arg("--project")
        .arg(project)
        .args(args)
        .env_remove("SHEPHERD_LOG")
        .output()
        .expect("Failed to run shepherd")
}

fn code(output: &Output) -> i32 {
    output.status.code().expect("shepherd was killed by a signal")
}

fn initialized() -> TempDir {
    let temp = TempDir::new().unwrap();
    assert_eq!(code(&shepherd(temp.path(), &["init"])), 0);
    temp
}

#[test]
fn test_commands_before_init_fail_softly() {
    let temp = TempDir::new().unwrap();
    let output = shepherd(temp.path(), &["next"]);
    assert_eq!(code(&output), 1);
    assert!(String::from_utf8_lossy(&output.stderr).contains("shepherd init"));
}

#[test]
fn test_new_next_and_advance() {
    let temp = initialized();

    assert_eq!(
        code(&shepherd(temp.path(), &["new", "Login form", "--file", "src/login.ts"])),
        0
    );
    assert!(temp
        .path()
        .join("features/ready/001-login-form.md")
        .exists());

    let next = shepherd(temp.path(), &["next"]);
    assert_eq!(code(&next), 0);
    assert!(String::from_utf8_lossy(&next.stdout).contains("001"));

    assert_eq!(code(&shepherd(temp.path(), &["advance", "1", "review"])), 2);
    assert_eq!(code(&shepherd(temp.path(), &["advance", "1", "testing"])), 0);
    assert!(temp
        .path()
        .join("features/testing/001-login-form.md")
        .exists());

    assert_eq!(code(&shepherd(temp.path(), &["status"])), 0);
}

#[test]
fn test_inconsistent_store_blocks() {
    let temp = initialized();
    fs::write(
        temp.path().join("features/building/003-x.md"),
        "---\nstatus: review\n---\n",
    )
    .unwrap();

    let check = shepherd(temp.path(), &["check"]);
    assert_eq!(code(&check), 2);
    assert!(String::from_utf8_lossy(&check.stderr).contains("003"));
    assert_eq!(code(&shepherd(temp.path(), &["next"])), 2);
}

#[test]
fn test_claim_conflict_is_a_warning() {
    let temp = initialized();
    fs::write(
        temp.path().join("features/building/001-a.md"),
        "---\nstatus: building\naffected-files:\n  - src/x.ts\n---\n",
    )
    .unwrap();

    assert_eq!(code(&shepherd(temp.path(), &["claim", "2", "src/x.ts"])), 1);
    assert_eq!(code(&shepherd(temp.path(), &["claim", "2", "src/y.ts"])), 0);
}

#[cfg(unix)]
#[test]
fn test_gate_exit_codes() {
    let temp = initialized();
    fs::write(
        temp.path().join("features/building/001-a.md"),
        "---\nstatus: building\n---\n",
    )
    .unwrap();

    // No manifests and nothing configured.
    assert_eq!(code(&shepherd(temp.path(), &["gate"])), 1);

    fs::write(
        temp.path().join("shepherd.toml"),
        "[gate]\nfast = [\"true\"]\nfull = [\"true\", \"false\"]\n",
    )
    .unwrap();
    assert_eq!(code(&shepherd(temp.path(), &["gate"])), 0);
    assert_eq!(code(&shepherd(temp.path(), &["gate", "--full"])), 2);

    // The full gate blocks leaving building.
    assert_eq!(code(&shepherd(temp.path(), &["advance", "1", "review"])), 2);
    assert!(temp.path().join("features/building/001-a.md").exists());

    fs::write(
        temp.path().join("features/testing/002-b.md"),
        "---\nstatus: testing\n---\n",
    )
    .unwrap();
    assert_eq!(code(&shepherd(temp.path(), &["gate", "--full"])), 0);
}

#[test]
fn test_guard_exit_codes() {
    let temp = initialized();

    assert_eq!(code(&shepherd(temp.path(), &["guard", "rm", "-rf", "/"])), 2);
    assert_eq!(code(&shepherd(temp.path(), &["guard", "rm -rf ./build"])), 0);
    assert_eq!(
        code(&shepherd(temp.path(), &["guard", "git", "push", "--force"])),
        2
    );
}

#[test]
fn test_guard_hook_payloads() {
    let temp = initialized();

    let run_hook = |payload: &str| {
        let mut child = Command::new(env!("CARGO_BIN_EXE_shepherd"))
            .arg("--project")
            .arg(temp.path())
            .args(["guard", "--hook"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();
        child
            .stdin
            .take()
            .unwrap()
            .write_all(payload.as_bytes())
            .unwrap();
        child.wait_with_output().unwrap()
    };

    let rejected = run_hook(r#"{"tool_name":"Bash","tool_input":{"command":"git push -f"}}"#);
    assert_eq!(code(&rejected), 2);
    assert!(String::from_utf8_lossy(&rejected.stderr).contains("--force-with-lease"));

    let other_tool = run_hook(r#"{"tool_name":"Edit","tool_input":{"command":"rm -rf /"}}"#);
    assert_eq!(code(&other_tool), 0);
}
