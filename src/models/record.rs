use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::models::stage::{Stage, StatusField};
use crate::validation::parse_record_number;

/// Stable record identifier. Rendered zero-padded to three digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u32);

impl RecordId {
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    pub fn number(&self) -> u32 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_record_number(s).map(RecordId)
    }
}

/// A feature record as read from the store.
///
/// `location` is the sub-collection the file sits in; `status` is what the
/// header claims. The two are expected to agree.
#[derive(Debug, Clone)]
pub struct FeatureRecord {
    pub id: RecordId,
    pub title: String,
    pub status: StatusField,
    pub affected_files: Vec<String>,
    pub location: Stage,
    pub path: PathBuf,
}

impl FeatureRecord {
    /// Whether the header status agrees with the physical location.
    /// Records without a status are not considered.
    pub fn is_consistent(&self) -> bool {
        match &self.status {
            StatusField::Missing => true,
            StatusField::Invalid(_) => false,
            StatusField::Valid { stage, .. } => *stage == self.location,
        }
    }

    /// Title for display, falling back to the file name.
    pub fn display_title(&self) -> String {
        if self.title.is_empty() {
            self.path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| self.id.to_string())
        } else {
            self.title.clone()
        }
    }
}

/// Turn a title into a file-name slug: lowercase ASCII alphanumerics
/// separated by single dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }

    if slug.len() > 60 {
        slug.truncate(60);
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    if slug.is_empty() {
        "feature".to_string()
    } else {
        slug
    }
}
