//! Advisory file-ownership checks between in-flight records.
//!
//! No lock is taken. A clean result only says nothing overlapped at the
//! moment of the check; a second agent can still claim the same files right
//! after. Drivers re-check immediately before claiming.

use glob::Pattern;

use crate::error::LifecycleResult;
use crate::fs::DocumentStore;
use crate::models::record::RecordId;
use crate::models::stage::Stage;

/// One proposed path already claimed by another in-flight record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipConflict {
    pub path: String,
    pub other_id: RecordId,
    pub other_title: String,
    pub other_status: Stage,
}

/// Normalize a repository-relative path for comparison.
fn normalize(path: &str) -> String {
    let path = path.trim().replace('\\', "/");
    let mut path = path.as_str();
    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }
    path.to_string()
}

fn is_glob(path: &str) -> bool {
    path.contains(['*', '?', '['])
}

/// Whether two claim entries cover at least one common file.
///
/// Entries match when equal, when one is a directory claim (trailing `/`)
/// containing the other, or when one is a glob pattern matching the other.
pub fn claims_overlap(a: &str, b: &str) -> bool {
    let a = normalize(a);
    let b = normalize(b);

    if a.trim_end_matches('/') == b.trim_end_matches('/') {
        return true;
    }

    if (a.ends_with('/') && b.starts_with(&a)) || (b.ends_with('/') && a.starts_with(&b)) {
        return true;
    }

    let glob_match = |pattern: &str, candidate: &str| {
        Pattern::new(pattern)
            .map(|p| p.matches(candidate))
            .unwrap_or(false)
    };

    (is_glob(&a) && glob_match(&a, &b)) || (is_glob(&b) && glob_match(&b, &a))
}

/// Check a proposed file set against every record in `testing` and `building`.
///
/// The proposing record (if it already exists) is excluded. Conflicts come
/// back in proposed-path order, then by record id.
pub fn check_ownership(
    store: &DocumentStore,
    proposer: Option<RecordId>,
    proposed: &[String],
) -> LifecycleResult<Vec<OwnershipConflict>> {
    let mut in_flight = Vec::new();
    for stage in Stage::ALL.into_iter().filter(Stage::is_in_flight) {
        let listing = store.read_stage(stage)?;
        for unreadable in &listing.unreadable {
            tracing::warn!(
                record = %unreadable.id,
                stage = %stage,
                reason = %unreadable.reason,
                "in-flight record has an unreadable header; its file claims are unknown"
            );
        }
        in_flight.extend(
            listing
                .records
                .into_iter()
                .filter(|record| Some(record.id) != proposer),
        );
    }
    in_flight.sort_by_key(|record| record.id);

    let mut conflicts = Vec::new();
    for path in proposed {
        for record in &in_flight {
            if record
                .affected_files
                .iter()
                .any(|claimed| claims_overlap(claimed, path))
            {
                conflicts.push(OwnershipConflict {
                    path: path.clone(),
                    other_id: record.id,
                    other_title: record.display_title(),
                    other_status: record.location,
                });
            }
        }
    }

    if conflicts.is_empty() {
        tracing::debug!(files = proposed.len(), "ownership check clean");
    } else {
        tracing::warn!(count = conflicts.len(), "ownership conflicts found");
    }

    Ok(conflicts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store() -> (TempDir, DocumentStore) {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::new(temp.path());
        store.initialize().unwrap();
        (temp, store)
    }

    fn put(store: &DocumentStore, stage: Stage, name: &str, title: &str, files: &[&str]) {
        let mut content = format!("---\nstatus: {stage}\ntitle: {title}\naffected-files:\n");
        for file in files {
            content.push_str(&format!("  - {file}\n"));
        }
        content.push_str("---\n");
        fs::write(store.stage_dir(stage).join(name), content).unwrap();
    }

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_conflict_with_building_record() {
        let (_temp, store) = store();
        put(&store, Stage::Building, "001-a.md", "Feature A", &["src/x.ts"]);

        let conflicts =
            check_ownership(&store, None, &paths(&["src/x.ts", "src/y.ts"])).unwrap();

        assert_eq!(
            conflicts,
            vec![OwnershipConflict {
                path: "src/x.ts".to_string(),
                other_id: RecordId::new(1),
                other_title: "Feature A".to_string(),
                other_status: Stage::Building,
            }]
        );
    }

    #[test]
    fn test_unreadable_in_flight_record_does_not_hide_others() {
        let (_temp, store) = store();
        fs::write(
            store.stage_dir(Stage::Testing).join("001-broken.md"),
            "---\nstatus: [testing\naffected-files:\n  - src/x.ts\n---\n",
        )
        .unwrap();
        put(&store, Stage::Building, "002-b.md", "B", &["src/x.ts"]);

        let conflicts = check_ownership(&store, None, &paths(&["src/x.ts"])).unwrap();

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].other_id, RecordId::new(2));
    }

    #[test]
    fn test_ready_review_and_completed_hold_no_claims() {
        let (_temp, store) = store();
        put(&store, Stage::Ready, "001-a.md", "A", &["src/x.ts"]);
        put(&store, Stage::Review, "002-b.md", "B", &["src/x.ts"]);
        put(&store, Stage::Completed, "003-c.md", "C", &["src/x.ts"]);

        assert!(check_ownership(&store, None, &paths(&["src/x.ts"]))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_proposer_is_excluded() {
        let (_temp, store) = store();
        put(&store, Stage::Testing, "004-a.md", "A", &["src/x.ts"]);

        let conflicts =
            check_ownership(&store, Some(RecordId::new(4)), &paths(&["src/x.ts"])).unwrap();
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_multiple_owners_reported_in_id_order() {
        let (_temp, store) = store();
        put(&store, Stage::Building, "007-b.md", "B", &["src/shared.ts"]);
        put(&store, Stage::Testing, "003-a.md", "A", &["./src/shared.ts"]);

        let conflicts = check_ownership(&store, None, &paths(&["src/shared.ts"])).unwrap();
        let ids: Vec<u32> = conflicts.iter().map(|c| c.other_id.number()).collect();
        assert_eq!(ids, vec![3, 7]);
        assert_eq!(conflicts[0].other_status, Stage::Testing);
    }

    #[test]
    fn test_claims_overlap_rules() {
        assert!(claims_overlap("src/x.ts", "./src/x.ts"));
        assert!(claims_overlap("src/auth/", "src/auth/login.ts"));
        assert!(claims_overlap("src/**/*.ts", "src/auth/login.ts"));
        assert!(claims_overlap("src/auth/login.ts", "src/*/login.ts"));
        assert!(!claims_overlap("src/x.ts", "src/y.ts"));
        assert!(!claims_overlap("src/auth", "src/authz.ts"));
    }
}
