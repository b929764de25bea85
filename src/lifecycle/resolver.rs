//! Pending-work discovery and the store-wide consistency scan.

use std::path::PathBuf;

use crate::error::{consistency_remedy, LifecycleError, LifecycleResult};
use crate::fs::DocumentStore;
use crate::models::record::{FeatureRecord, RecordId};
use crate::models::stage::{Stage, StatusField};

/// Order in which stages are offered as work. Unblocking started work comes
/// before intake, and intake before review.
pub const WORK_PRIORITY: [Stage; 3] = [Stage::Testing, Stage::Ready, Stage::Review];

/// Declared status used for records whose header block cannot be parsed.
pub const UNREADABLE_STATUS: &str = "<unreadable header>";

/// The next piece of work a driver should pick up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWork {
    pub stage: Stage,
    pub record_id: RecordId,
    pub title: String,
    pub directive: String,
}

/// A record whose header status disagrees with the directory it sits in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub record_id: RecordId,
    pub location: Stage,
    pub declared: String,
    pub path: PathBuf,
}

impl Violation {
    /// The minimal fix, phrased for whoever has to apply it.
    pub fn remedy(&self) -> String {
        consistency_remedy(&self.location, &self.declared)
    }

    pub fn into_error(self) -> LifecycleError {
        LifecycleError::ConsistencyViolation {
            id: self.record_id,
            location: self.location,
            declared: self.declared,
        }
    }
}

/// Records per stage plus the current pending work.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub counts: Vec<(Stage, usize)>,
    pub pending: Option<PendingWork>,
    pub violations: Vec<Violation>,
}

/// What the driver should do with a record found in `stage`.
pub fn directive_for(stage: Stage, record: &FeatureRecord) -> String {
    let id = record.id;
    match stage {
        Stage::Testing => format!(
            "Record {id} is in testing: write failing tests covering its affected files, \
             then run `shepherd advance {id} building`"
        ),
        Stage::Ready => format!(
            "Record {id} is ready: run `shepherd claim {id} <files>` to check ownership, \
             then `shepherd advance {id} testing` and start writing tests"
        ),
        Stage::Review => format!(
            "Record {id} awaits review: review the change, then `shepherd advance {id} completed` \
             or send it back with `shepherd advance {id} building`"
        ),
        Stage::Building => format!(
            "Record {id} is building: implement until the tests pass, \
             then `shepherd advance {id} review`"
        ),
        Stage::Completed => format!("Record {id} is completed: nothing to do"),
    }
}

/// Find the next piece of work, checking stages in `WORK_PRIORITY` order.
///
/// The lowest id in the first non-empty stage wins, so repeated calls with
/// no change in between return the same answer. Documents without a status
/// are not work.
pub fn find_pending_work(store: &DocumentStore) -> LifecycleResult<Option<PendingWork>> {
    for stage in WORK_PRIORITY {
        let records = store.list_records(stage)?;
        if let Some(record) = records
            .into_iter()
            .find(|r| r.status != StatusField::Missing)
        {
            let work = PendingWork {
                stage,
                record_id: record.id,
                title: record.display_title(),
                directive: directive_for(stage, &record),
            };
            tracing::debug!(stage = %stage, record = %work.record_id, "pending work found");
            return Ok(Some(work));
        }
    }

    tracing::debug!("no pending work");
    Ok(None)
}

/// Compare every record's header status with its location.
///
/// Records without a status are skipped; wrong values and unparseable
/// headers are reported.
pub fn consistency_scan(store: &DocumentStore) -> LifecycleResult<Vec<Violation>> {
    let mut violations = Vec::new();

    for stage in Stage::ALL {
        let listing = store.read_stage(stage)?;

        for record in listing.records {
            if record.is_consistent() {
                continue;
            }
            violations.push(Violation {
                record_id: record.id,
                location: stage,
                declared: record.status.declared().to_string(),
                path: record.path,
            });
        }

        for unreadable in listing.unreadable {
            violations.push(Violation {
                record_id: unreadable.id,
                location: stage,
                declared: UNREADABLE_STATUS.to_string(),
                path: unreadable.path,
            });
        }
    }

    if !violations.is_empty() {
        tracing::warn!(count = violations.len(), "consistency violations found");
    }

    Ok(violations)
}

/// Fail with the first violation if the store is inconsistent.
pub fn ensure_consistent(store: &DocumentStore) -> LifecycleResult<()> {
    match consistency_scan(store)?.into_iter().next() {
        Some(violation) => Err(violation.into_error()),
        None => Ok(()),
    }
}

/// Build the data behind `shepherd status`.
pub fn status_report(store: &DocumentStore) -> LifecycleResult<StatusReport> {
    let mut counts = Vec::with_capacity(Stage::ALL.len());
    for stage in Stage::ALL {
        counts.push((stage, store.list_records(stage)?.len()));
    }

    Ok(StatusReport {
        counts,
        pending: find_pending_work(store)?,
        violations: consistency_scan(store)?,
    })
}
