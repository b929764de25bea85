//! New feature intake: allocate an id, check ownership, write into `ready/`.

use crate::error::LifecycleResult;
use crate::fs::DocumentStore;
use crate::models::record::FeatureRecord;

use super::ownership::{check_ownership, OwnershipConflict};

/// Create a record in `ready/`.
///
/// The ownership check runs first and its conflicts are returned with the
/// new record. They are advisory; the record is written either way.
pub fn create_feature(
    store: &DocumentStore,
    title: &str,
    affected_files: &[String],
    body: &str,
) -> LifecycleResult<(FeatureRecord, Vec<OwnershipConflict>)> {
    let conflicts = check_ownership(store, None, affected_files)?;
    let record = store.create_record(title, affected_files, body)?;
    Ok((record, conflicts))
}
