//! Record file naming and lookup utilities
//!
//! Record files are named with their zero-padded id followed by a title slug:
//! - `001-login-form.md`
//! - `002-password-reset.md`
//! - `017.md` (slug is optional)
//!
//! Markdown files without a numeric prefix (`README.md`, `DASHBOARD.md`)
//! are not records and are ignored by every lookup here.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LifecycleError, LifecycleResult};
use crate::models::record::{slugify, RecordId};

/// Extract the record id from a record file name.
///
/// Returns `None` for non-Markdown files and for names that do not start
/// with digits followed by `-` or the extension.
pub fn parse_record_file_name(filename: &str) -> Option<RecordId> {
    let path = Path::new(filename);
    if path.extension().and_then(|s| s.to_str()) != Some("md") {
        return None;
    }

    let stem = path.file_stem().and_then(|s| s.to_str())?;
    let digits_end = stem
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(stem.len());
    if digits_end == 0 {
        return None;
    }

    let rest = &stem[digits_end..];
    if !rest.is_empty() && !rest.starts_with('-') {
        return None;
    }

    stem[..digits_end]
        .parse::<RecordId>()
        .ok()
}

/// Generate a record filename from its id and title.
pub fn record_filename(id: RecordId, title: &str) -> String {
    format!("{id}-{}.md", slugify(title))
}

/// List record files in a stage directory, sorted by id then file name.
///
/// A missing directory is an empty stage.
pub fn list_record_files(dir: &Path) -> LifecycleResult<Vec<(RecordId, PathBuf)>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|e| LifecycleError::io(dir, e))?;

    let mut records = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| LifecycleError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };

        if let Some(id) = parse_record_file_name(name) {
            records.push((id, path));
        }
    }

    records.sort();
    Ok(records)
}

/// Find a record file by id in a single stage directory.
pub fn find_record_file(dir: &Path, id: RecordId) -> LifecycleResult<Option<PathBuf>> {
    Ok(list_record_files(dir)?
        .into_iter()
        .find(|(record_id, _)| *record_id == id)
        .map(|(_, path)| path))
}
