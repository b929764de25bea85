use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sub-collection for pre-lifecycle ideas. Holds documents without a status
/// and only matters when allocating record ids.
pub const IDEATION_DIR: &str = "ideation";

/// Older spelling of `completed`, accepted only for the terminal stage.
// TODO: settle on `completed` and migrate archives still carrying `done`.
pub const LEGACY_COMPLETED_STATUS: &str = "done";

/// A lifecycle stage. Each stage is also the name of the sub-collection
/// holding its records.
///
/// Progression is strictly one step forward:
/// - `Ready` -> `Testing` (tests get written first)
/// - `Testing` -> `Building` (implementation against the failing tests)
/// - `Building` -> `Review`
/// - `Review` -> `Completed` | `Building` (rework)
/// - `Completed` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Ready,
    Testing,
    Building,
    Review,
    #[serde(alias = "done")]
    Completed,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Ready,
        Stage::Testing,
        Stage::Building,
        Stage::Review,
        Stage::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Ready => "ready",
            Stage::Testing => "testing",
            Stage::Building => "building",
            Stage::Review => "review",
            Stage::Completed => "completed",
        }
    }

    /// Directory name of this stage's sub-collection.
    pub fn dir_name(&self) -> &'static str {
        self.as_str()
    }

    /// The stage one step forward, if any.
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Ready => Some(Stage::Testing),
            Stage::Testing => Some(Stage::Building),
            Stage::Building => Some(Stage::Review),
            Stage::Review => Some(Stage::Completed),
            Stage::Completed => None,
        }
    }

    /// Stages whose records hold an ownership claim on their affected files.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Stage::Testing | Stage::Building)
    }

    /// Map a header `status` value onto a stage.
    ///
    /// `done` is accepted as a synonym for `completed`; nothing else is.
    pub fn from_status(raw: &str) -> Option<Stage> {
        match raw.trim() {
            "ready" => Some(Stage::Ready),
            "testing" => Some(Stage::Testing),
            "building" => Some(Stage::Building),
            "review" => Some(Stage::Review),
            "completed" | LEGACY_COMPLETED_STATUS => Some(Stage::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::from_status(&s.to_ascii_lowercase()).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown stage '{s}'. Expected one of: ready, testing, building, review, completed"
            )
        })
    }
}

/// The `status` field of a record header.
///
/// Absence and a wrong value are distinct: a document without a status
/// (an index or dashboard file) is not a lifecycle record, while a record
/// with an unrecognized status is a consistency violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusField {
    Missing,
    Invalid(String),
    Valid { stage: Stage, raw: String },
}

impl StatusField {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => StatusField::Missing,
            Some(value) => match Stage::from_status(value) {
                Some(stage) => StatusField::Valid {
                    stage,
                    raw: value.to_string(),
                },
                None => StatusField::Invalid(value.to_string()),
            },
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            StatusField::Valid { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The status as written in the header, for messages.
    pub fn declared(&self) -> &str {
        match self {
            StatusField::Missing => "<missing>",
            StatusField::Invalid(raw) => raw,
            StatusField::Valid { raw, .. } => raw,
        }
    }
}
