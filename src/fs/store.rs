//! The document store: one sub-collection per lifecycle stage.
//!
//! Nothing is cached. Every call re-reads the directory tree, since other
//! agents may have moved records since the last look.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LifecycleError, LifecycleResult};
use crate::models::record::{FeatureRecord, RecordId};
use crate::models::stage::{Stage, IDEATION_DIR};
use crate::parser::header::{render_record, RecordHeader};

use super::locking::{locked_read, locked_write};
use super::record_files::{find_record_file, list_record_files, record_filename};

/// Default store location relative to the project root.
pub const DEFAULT_STORE_DIR: &str = "features";

/// A record file whose header block could not be parsed.
#[derive(Debug, Clone)]
pub struct UnreadableRecord {
    pub id: RecordId,
    pub location: Stage,
    pub path: PathBuf,
    pub reason: String,
}

/// Everything found in one stage directory.
#[derive(Debug, Clone, Default)]
pub struct StageListing {
    pub records: Vec<FeatureRecord>,
    pub unreadable: Vec<UnreadableRecord>,
}

#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the store has been initialized (any stage directory exists).
    pub fn exists(&self) -> bool {
        Stage::ALL.iter().any(|stage| self.stage_dir(*stage).is_dir())
    }

    pub fn stage_dir(&self, stage: Stage) -> PathBuf {
        self.root.join(stage.dir_name())
    }

    pub fn ideation_dir(&self) -> PathBuf {
        self.root.join(IDEATION_DIR)
    }

    /// Create the root and every sub-collection. Existing directories are
    /// left alone; returns the directories that had to be created.
    pub fn initialize(&self) -> LifecycleResult<Vec<PathBuf>> {
        let mut created = Vec::new();

        let dirs = std::iter::once(self.ideation_dir())
            .chain(Stage::ALL.iter().map(|stage| self.stage_dir(*stage)));

        for dir in dirs {
            if !dir.is_dir() {
                fs::create_dir_all(&dir).map_err(|e| LifecycleError::io(&dir, e))?;
                created.push(dir);
            }
        }

        let readme = self.root.join("README.md");
        if !readme.exists() {
            fs::write(&readme, README).map_err(|e| LifecycleError::io(&readme, e))?;
        }

        Ok(created)
    }

    /// Read one record file.
    pub fn load_record(
        &self,
        id: RecordId,
        location: Stage,
        path: &Path,
    ) -> LifecycleResult<FeatureRecord> {
        let content = locked_read(path)?;
        let header = RecordHeader::parse(&content).map_err(|e| LifecycleError::Header {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        })?;

        Ok(FeatureRecord {
            id,
            title: header.title.unwrap_or_default(),
            status: header.status,
            affected_files: header.affected_files,
            location,
            path: path.to_path_buf(),
        })
    }

    /// Read every record in a stage, keeping unreadable ones apart.
    pub fn read_stage(&self, stage: Stage) -> LifecycleResult<StageListing> {
        let mut listing = StageListing::default();

        for (id, path) in list_record_files(&self.stage_dir(stage))? {
            match self.load_record(id, stage, &path) {
                Ok(record) => listing.records.push(record),
                Err(LifecycleError::Header { path, reason }) => {
                    tracing::warn!(record = %id, path = %path.display(), %reason, "unreadable record header");
                    listing.unreadable.push(UnreadableRecord {
                        id,
                        location: stage,
                        path,
                        reason,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(listing)
    }

    /// Records in a stage, sorted by id. Unreadable headers are skipped.
    pub fn list_records(&self, stage: Stage) -> LifecycleResult<Vec<FeatureRecord>> {
        Ok(self.read_stage(stage)?.records)
    }

    /// Locate a record in a specific stage.
    pub fn find_record_in(
        &self,
        stage: Stage,
        id: RecordId,
    ) -> LifecycleResult<Option<FeatureRecord>> {
        match find_record_file(&self.stage_dir(stage), id)? {
            Some(path) => self.load_record(id, stage, &path).map(Some),
            None => Ok(None),
        }
    }

    /// Locate a record across all five stages.
    pub fn find_record(&self, id: RecordId) -> LifecycleResult<Option<FeatureRecord>> {
        for stage in Stage::ALL {
            if let Some(record) = self.find_record_in(stage, id)? {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// The id the next created record gets: one past the highest id found
    /// anywhere in the store, ideation and the archive included.
    pub fn next_id(&self) -> LifecycleResult<RecordId> {
        let mut highest = RecordId::new(0);

        let dirs = std::iter::once(self.ideation_dir())
            .chain(Stage::ALL.iter().map(|stage| self.stage_dir(*stage)));

        for dir in dirs {
            if let Some((id, _)) = list_record_files(&dir)?.into_iter().max() {
                highest = highest.max(id);
            }
        }

        Ok(highest.next())
    }

    /// Write a new record into `ready/` and return it.
    pub fn create_record(
        &self,
        title: &str,
        affected_files: &[String],
        body: &str,
    ) -> LifecycleResult<FeatureRecord> {
        let dir = self.stage_dir(Stage::Ready);
        fs::create_dir_all(&dir).map_err(|e| LifecycleError::io(&dir, e))?;

        let id = self.next_id()?;
        let path = dir.join(record_filename(id, title));
        if path.exists() {
            return Err(LifecycleError::DestinationExists { id, path });
        }

        let content = render_record(Stage::Ready, title, affected_files, body);
        locked_write(&path, &content)?;
        tracing::info!(record = %id, path = %path.display(), "created record");

        self.load_record(id, Stage::Ready, &path)
    }
}

const README: &str = r#"# Feature store

Each feature record lives in exactly one sub-collection, and its header
`status` always names that sub-collection.

- `ideation/` - rough ideas, no status, not tracked
- `ready/` - accepted and waiting for tests
- `testing/` - failing tests being written
- `building/` - implementation in progress
- `review/` - waiting for review
- `completed/` - archive, never edited

Move records with `shepherd advance <id> <stage>`, never by hand.
"#;
