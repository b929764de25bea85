//! Lifecycle round trip, priority, consistency, ownership and stuck checks

use std::fs;
use std::time::Duration;

use shepherd::error::LifecycleError;
use shepherd::lifecycle::{
    check_ownership, check_stuck, consistency_scan, create_feature, ensure_consistent,
    find_pending_work, transition,
};
use shepherd::models::record::RecordId;
use shepherd::models::stage::{Stage, StatusField};

use super::helpers::{age_file, project, write_record};

const THIRTY_MINUTES: Duration = Duration::from_secs(30 * 60);

#[test]
fn test_record_walks_the_whole_lifecycle() {
    let (_temp, store) = project();
    let (record, conflicts) =
        create_feature(&store, "Add login form", &["src/login.ts".to_string()], "Details.")
            .unwrap();
    assert!(conflicts.is_empty());
    assert_eq!(record.id, RecordId::new(1));

    let path = [
        Stage::Ready,
        Stage::Testing,
        Stage::Building,
        Stage::Review,
        Stage::Completed,
    ];
    for pair in path.windows(2) {
        let outcome = transition(&store, record.id, pair[0], pair[1]).unwrap();
        assert!(!outcome.from_path.exists());

        let moved = store.find_record(record.id).unwrap().unwrap();
        assert_eq!(moved.location, pair[1]);
        assert_eq!(moved.status.stage(), Some(pair[1]));
        assert!(consistency_scan(&store).unwrap().is_empty());
    }

    let archived = store.find_record(record.id).unwrap().unwrap();
    let content = fs::read_to_string(&archived.path).unwrap();
    assert!(content.contains("status: completed"));
    assert!(content.contains("Details."));
    assert_eq!(archived.affected_files, vec!["src/login.ts".to_string()]);
}

#[test]
fn test_rework_then_complete() {
    let (_temp, store) = project();
    write_record(&store, Stage::Review, "004-x.md", "review", &[]);
    let id = RecordId::new(4);

    transition(&store, id, Stage::Review, Stage::Building).unwrap();
    transition(&store, id, Stage::Building, Stage::Review).unwrap();
    transition(&store, id, Stage::Review, Stage::Completed).unwrap();

    assert_eq!(
        store.find_record(id).unwrap().unwrap().location,
        Stage::Completed
    );
}

#[test]
fn test_every_disallowed_pair_is_rejected_without_effect() {
    for from in Stage::ALL {
        for to in Stage::ALL {
            let allowed = from.next() == Some(to) || (from == Stage::Review && to == Stage::Building);
            if allowed {
                continue;
            }

            let (_temp, store) = project();
            let path = write_record(&store, from, "001-x.md", from.as_str(), &[]);
            let before = fs::read_to_string(&path).unwrap();

            let err = transition(&store, RecordId::new(1), from, to).unwrap_err();
            assert!(
                matches!(err, LifecycleError::InvalidTransition { .. }),
                "{from} -> {to}"
            );
            assert_eq!(fs::read_to_string(&path).unwrap(), before, "{from} -> {to}");
        }
    }
}

#[test]
fn test_manual_edit_yields_exactly_one_violation() {
    let (_temp, store) = project();
    write_record(&store, Stage::Ready, "001-a.md", "ready", &[]);
    let edited = write_record(&store, Stage::Building, "002-b.md", "building", &[]);
    write_record(&store, Stage::Completed, "003-c.md", "done", &[]);
    assert!(consistency_scan(&store).unwrap().is_empty());

    let content = fs::read_to_string(&edited).unwrap();
    fs::write(&edited, content.replace("status: building", "status: review")).unwrap();

    let violations = consistency_scan(&store).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].record_id, RecordId::new(2));
    assert_eq!(violations[0].location, Stage::Building);
    assert_eq!(violations[0].declared, "review");

    let err = ensure_consistent(&store).unwrap_err();
    assert!(err.is_blocking());
    assert!(err.to_string().contains("move the file to review/"));
}

#[test]
fn test_documents_without_status_are_not_violations() {
    let (_temp, store) = project();
    fs::write(
        store.stage_dir(Stage::Testing).join("000-dashboard.md"),
        "# Dashboard\n",
    )
    .unwrap();
    fs::write(store.stage_dir(Stage::Testing).join("INDEX.md"), "# Index\n").unwrap();

    assert!(consistency_scan(&store).unwrap().is_empty());
    assert!(find_pending_work(&store).unwrap().is_none());
}

#[test]
fn test_priority_and_idempotence() {
    let (_temp, store) = project();
    write_record(&store, Stage::Ready, "001-a.md", "ready", &[]);
    write_record(&store, Stage::Testing, "005-b.md", "testing", &[]);
    write_record(&store, Stage::Testing, "002-c.md", "testing", &[]);
    write_record(&store, Stage::Review, "003-d.md", "review", &[]);

    let first = find_pending_work(&store).unwrap().unwrap();
    assert_eq!(first.stage, Stage::Testing);
    assert_eq!(first.record_id, RecordId::new(2));
    assert_eq!(find_pending_work(&store).unwrap().unwrap(), first);
}

#[test]
fn test_ownership_conflict_against_building_record() {
    let (_temp, store) = project();
    write_record(&store, Stage::Building, "001-a.md", "building", &["src/x.ts"]);

    let proposed = vec!["src/x.ts".to_string(), "src/y.ts".to_string()];
    let conflicts = check_ownership(&store, Some(RecordId::new(2)), &proposed).unwrap();

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].path, "src/x.ts");
    assert_eq!(conflicts[0].other_id, RecordId::new(1));
    assert_eq!(conflicts[0].other_status, Stage::Building);

    let (record, advisory) = create_feature(&store, "B", &proposed, "").unwrap();
    assert_eq!(advisory, conflicts);
    assert_eq!(record.status, StatusField::parse(Some("ready")));
}

#[test]
fn test_stuck_after_thirty_minutes_only() {
    let (_temp, store) = project();
    let old = write_record(&store, Stage::Building, "001-old.md", "building", &[]);
    let fresh = write_record(&store, Stage::Building, "002-fresh.md", "building", &[]);
    age_file(&old, 31);
    age_file(&fresh, 10);

    let stuck = check_stuck(&store, THIRTY_MINUTES).unwrap();
    assert_eq!(stuck.len(), 1);
    assert_eq!(stuck[0].record_id, RecordId::new(1));
    assert!(stuck[0].elapsed_minutes >= 31);
}
