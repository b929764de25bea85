//! Error taxonomy for lifecycle operations.
//!
//! Blocking errors (consistency violations, invalid transitions) map to exit
//! code 2 at the CLI boundary. Everything else is a plain failure.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::record::RecordId;
use crate::models::stage::Stage;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(
        "record {id} is in {location}/ but its header says status: {declared}. To fix: {}",
        consistency_remedy(.location, .declared)
    )]
    ConsistencyViolation {
        id: RecordId,
        location: Stage,
        declared: String,
    },

    #[error(
        "invalid transition for record {id}: {from} -> {to}. \
         Allowed from {from}: {allowed}"
    )]
    InvalidTransition {
        id: RecordId,
        from: Stage,
        to: Stage,
        allowed: String,
    },

    #[error("record {id} not found in {stage}/. Run `shepherd status` to locate it")]
    RecordNotFound { id: RecordId, stage: String },

    #[error(
        "cannot move record {id}: {} already exists. \
         Rename or remove the duplicate before retrying",
        .path.display()
    )]
    DestinationExists { id: RecordId, path: PathBuf },

    #[error(
        "record {id} was rewritten to status: {to} but could not be moved from {} to {}: {source}. \
         Move the file manually or restore its status field",
        .from_path.display(),
        .to_path.display()
    )]
    PartialTransition {
        id: RecordId,
        to: Stage,
        from_path: PathBuf,
        to_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed header in {}: {reason}", .path.display())]
    Header { path: PathBuf, reason: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LifecycleError {
    /// Whether this error must stop the caller (exit code 2) rather than
    /// being reported as an ordinary failure.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            LifecycleError::ConsistencyViolation { .. } | LifecycleError::InvalidTransition { .. }
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LifecycleError::Io {
            path: path.into(),
            source,
        }
    }
}

/// The minimal fix for a record whose header disagrees with its directory.
///
/// Moving the file is only offered when the header names a real stage.
pub fn consistency_remedy(location: &Stage, declared: &str) -> String {
    match Stage::from_status(declared) {
        Some(declared) => format!(
            "update the status field to `{location}` or move the file to {declared}/"
        ),
        None => format!(
            "set the status field to `{location}` (valid values: ready, testing, building, review, completed)"
        ),
    }
}

pub type LifecycleResult<T> = std::result::Result<T, LifecycleError>;
