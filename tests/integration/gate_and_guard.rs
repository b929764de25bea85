//! Gate skipping and guard verdicts through the public API

use std::path::PathBuf;

use shepherd::config::GateConfig;
use shepherd::gate::{run_gate, GateKind, GateOutcome};
use shepherd::guard::{guard_command, GuardContext, GuardRule, GuardVerdict};
use shepherd::models::stage::Stage;

use super::helpers::{project, write_record};

fn gate_config(command: &str) -> GateConfig {
    GateConfig {
        fast: Some(vec![command.to_string()]),
        full: Some(vec![command.to_string()]),
        ..GateConfig::default()
    }
}

fn guard_ctx() -> GuardContext {
    GuardContext {
        current_branch: Some("main".to_string()),
        store_present: true,
        home_dir: Some(PathBuf::from("/home/agent")),
        protected_branches: vec!["main".to_string(), "master".to_string()],
    }
}

#[test]
fn test_gate_skipped_while_testing_even_if_check_would_fail() {
    let (temp, store) = project();
    write_record(&store, Stage::Testing, "001-a.md", "testing", &[]);
    let marker = temp.path().join("gate-ran");
    let command = format!("touch {} && false", marker.display());

    let outcome = run_gate(&store, temp.path(), GateKind::Full, &gate_config(&command)).unwrap();

    assert!(matches!(outcome, GateOutcome::Skipped { .. }));
    assert_eq!(outcome.exit_code(), 0);
    assert!(!marker.exists());
}

#[cfg(unix)]
#[test]
fn test_gate_fails_while_building() {
    let (temp, store) = project();
    write_record(&store, Stage::Building, "001-a.md", "building", &[]);

    let outcome = run_gate(
        &store,
        temp.path(),
        GateKind::Full,
        &gate_config("echo type error >&2; exit 1"),
    )
    .unwrap();

    assert_eq!(
        outcome,
        GateOutcome::Fail {
            command: "echo type error >&2; exit 1".to_string(),
            output: "type error".to_string(),
        }
    );
    assert_eq!(outcome.exit_code(), 2);
}

#[test]
fn test_gate_missing_tool_is_not_a_block() {
    let (temp, store) = project();
    write_record(&store, Stage::Review, "001-a.md", "review", &[]);

    let outcome = run_gate(
        &store,
        temp.path(),
        GateKind::Fast,
        &gate_config("no-such-checker-b81c --strict"),
    )
    .unwrap();

    assert!(matches!(outcome, GateOutcome::ToolingMissing { .. }));
    assert_eq!(outcome.exit_code(), 1);
}

#[test]
fn test_guard_properties() {
    let ctx = guard_ctx();

    assert!(!guard_command("rm -rf /", &ctx).is_allowed());
    assert!(guard_command("rm -rf ./build", &ctx).is_allowed());
    assert!(guard_command("git push --force-with-lease", &ctx).is_allowed());
    assert!(!guard_command("git push --force", &ctx).is_allowed());
}

#[test]
fn test_guard_rule_order_and_reasons() {
    let ctx = guard_ctx();

    match guard_command("mysql -e 'DROP DATABASE prod'", &ctx) {
        GuardVerdict::Reject { rule, reason } => {
            assert_eq!(rule, GuardRule::DropStatement);
            assert!(!reason.is_empty());
        }
        GuardVerdict::Allow => panic!("drop statement allowed"),
    }

    match guard_command("git commit -am 'quick fix'", &ctx) {
        GuardVerdict::Reject { rule, reason } => {
            assert_eq!(rule, GuardRule::ProtectedBranchCommit);
            assert!(reason.contains("main"));
        }
        GuardVerdict::Allow => panic!("commit on main allowed"),
    }

    let no_store = GuardContext {
        store_present: false,
        ..guard_ctx()
    };
    assert!(guard_command("git commit -am 'quick fix'", &no_store).is_allowed());
}
