//! Shared helpers for integration tests

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

use shepherd::fs::DocumentStore;
use shepherd::models::stage::Stage;

/// A scratch project with an initialized store under `features/`.
pub fn project() -> (TempDir, DocumentStore) {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let store = DocumentStore::new(temp.path().join("features"));
    store.initialize().expect("Failed to initialize store");
    (temp, store)
}

/// Write a record file directly, bypassing the transition executor.
pub fn write_record(
    store: &DocumentStore,
    stage: Stage,
    name: &str,
    status: &str,
    files: &[&str],
) -> PathBuf {
    let mut content = format!("---\nstatus: {status}\ntitle: {name}\n");
    if !files.is_empty() {
        content.push_str("affected-files:\n");
        for file in files {
            content.push_str(&format!("  - {file}\n"));
        }
    }
    content.push_str("---\n\nBody.\n");

    let path = store.stage_dir(stage).join(name);
    fs::write(&path, content).expect("Failed to write record");
    path
}

/// Push a file's modification time `minutes` into the past.
pub fn age_file(path: &Path, minutes: u64) {
    let mtime = SystemTime::now() - Duration::from_secs(minutes * 60);
    fs::File::options()
        .write(true)
        .open(path)
        .expect("Failed to open record")
        .set_modified(mtime)
        .expect("Failed to set mtime");
}
