//! Stuck detection for records sitting in `building`.
//!
//! A record's age is read from its file modification time on every call.
//! Nothing is persisted and nothing is remediated; the detector only warns.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{LifecycleError, LifecycleResult};
use crate::fs::DocumentStore;
use crate::models::record::RecordId;
use crate::models::stage::Stage;

/// Default time a record may sit in `building` untouched (30 minutes).
pub const DEFAULT_STUCK_THRESHOLD_MINUTES: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StuckRecord {
    pub record_id: RecordId,
    pub title: String,
    pub elapsed_minutes: i64,
    pub path: PathBuf,
}

impl StuckRecord {
    pub fn warning(&self) -> String {
        format!(
            "Record {} ({}) has been in building for {} minutes without progress",
            self.record_id, self.title, self.elapsed_minutes
        )
    }
}

/// Report records in `building` untouched for longer than `threshold`.
pub fn check_stuck(store: &DocumentStore, threshold: Duration) -> LifecycleResult<Vec<StuckRecord>> {
    check_stuck_at(store, threshold, Utc::now())
}

/// Same as [`check_stuck`] with an explicit clock.
pub fn check_stuck_at(
    store: &DocumentStore,
    threshold: Duration,
    now: DateTime<Utc>,
) -> LifecycleResult<Vec<StuckRecord>> {
    let threshold = chrono::Duration::from_std(threshold)
        .unwrap_or_else(|_| chrono::Duration::days(36_500));
    let listing = store.read_stage(Stage::Building)?;
    let candidates = listing
        .records
        .iter()
        .map(|record| (record.id, record.display_title(), &record.path))
        .chain(listing.unreadable.iter().map(|unreadable| {
            tracing::warn!(
                record = %unreadable.id,
                reason = %unreadable.reason,
                "building record has an unreadable header; checking its age anyway"
            );
            let title = unreadable
                .path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| unreadable.id.to_string());
            (unreadable.id, title, &unreadable.path)
        }));

    let mut stuck = Vec::new();
    for (record_id, title, path) in candidates {
        let modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(|e| LifecycleError::io(path, e))?;
        let elapsed = now.signed_duration_since(DateTime::<Utc>::from(modified));

        if elapsed > threshold {
            let entry = StuckRecord {
                record_id,
                title,
                elapsed_minutes: elapsed.num_minutes(),
                path: path.clone(),
            };
            tracing::warn!(
                record = %entry.record_id,
                minutes = entry.elapsed_minutes,
                "record appears stuck in building"
            );
            stuck.push(entry);
        }
    }
    stuck.sort_by_key(|entry| entry.record_id);

    Ok(stuck)
}
