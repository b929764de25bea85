//! Stage transitions.
//!
//! A transition rewrites the header status and then moves the file into the
//! target sub-collection. The two steps are not atomic: a crash between them
//! leaves a record whose status disagrees with its location, which the next
//! consistency scan reports. Callers only ever go through [`transition`], so
//! swapping the persistence primitive touches this file alone.

use std::fs;
use std::path::PathBuf;

use crate::error::{LifecycleError, LifecycleResult};
use crate::fs::locking::{locked_read, locked_write};
use crate::fs::record_files::find_record_file;
use crate::fs::DocumentStore;
use crate::models::record::RecordId;
use crate::models::stage::{Stage, StatusField};
use crate::parser::frontmatter::rewrite_frontmatter_field;
use crate::parser::header::{RecordHeader, STATUS_KEY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub record_id: RecordId,
    pub from: Stage,
    pub to: Stage,
    pub from_path: PathBuf,
    pub to_path: PathBuf,
}

/// Move record `id` from `from` to `to`.
///
/// Rejects invalid stage pairs, missing records, records whose header
/// disagrees with `from`, and name clashes in the target before writing
/// anything.
pub fn transition(
    store: &DocumentStore,
    id: RecordId,
    from: Stage,
    to: Stage,
) -> LifecycleResult<TransitionOutcome> {
    from.try_transition(id, to)?;

    let from_path = find_record_file(&store.stage_dir(from), id)?.ok_or_else(|| {
        LifecycleError::RecordNotFound {
            id,
            stage: from.to_string(),
        }
    })?;

    let content = locked_read(&from_path)?;
    let header = RecordHeader::parse(&content).map_err(|e| LifecycleError::Header {
        path: from_path.clone(),
        reason: format!("{e:#}"),
    })?;

    match &header.status {
        StatusField::Valid { stage, .. } if *stage == from => {}
        other => {
            return Err(LifecycleError::ConsistencyViolation {
                id,
                location: from,
                declared: other.declared().to_string(),
            })
        }
    }

    let target_dir = store.stage_dir(to);
    let file_name = from_path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("{id}.md")));
    let to_path = target_dir.join(file_name);
    if to_path.exists() {
        return Err(LifecycleError::DestinationExists { id, path: to_path });
    }

    fs::create_dir_all(&target_dir).map_err(|e| LifecycleError::io(&target_dir, e))?;

    let rewritten =
        rewrite_frontmatter_field(&content, STATUS_KEY, to.as_str()).map_err(|e| {
            LifecycleError::Header {
                path: from_path.clone(),
                reason: format!("{e:#}"),
            }
        })?;
    locked_write(&from_path, &rewritten)?;

    if let Err(source) = fs::rename(&from_path, &to_path) {
        tracing::error!(record = %id, %to, "status rewritten but relocation failed");
        return Err(LifecycleError::PartialTransition {
            id,
            to,
            from_path,
            to_path,
            source,
        });
    }

    tracing::info!(record = %id, %from, %to, "record transitioned");

    Ok(TransitionOutcome {
        record_id: id,
        from,
        to,
        from_path,
        to_path,
    })
}
