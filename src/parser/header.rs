//! Typed record header.
//!
//! ```text
//! ---
//! status: building
//! title: Add login form
//! affected-files:
//!   - src/login.ts
//!   - src/login.test.ts
//! ---
//! ```

use anyhow::Result;

use crate::models::stage::{Stage, StatusField};

use super::frontmatter::{extract_yaml_frontmatter, has_frontmatter};

pub const STATUS_KEY: &str = "status";
pub const TITLE_KEY: &str = "title";
pub const AFFECTED_FILES_KEY: &str = "affected-files";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    pub status: StatusField,
    pub title: Option<String>,
    pub affected_files: Vec<String>,
}

impl RecordHeader {
    /// Header of a document that has none.
    pub fn empty() -> Self {
        Self {
            status: StatusField::Missing,
            title: None,
            affected_files: Vec::new(),
        }
    }

    /// Parse the header of a record document.
    ///
    /// A document without a frontmatter block yields an empty header (status
    /// `Missing`). A block that exists but cannot be parsed is an error, since
    /// it may be hiding a status.
    pub fn parse(content: &str) -> Result<Self> {
        if !has_frontmatter(content) {
            return Ok(Self::empty());
        }

        let yaml = extract_yaml_frontmatter(content)?;
        if !yaml.is_mapping() && !yaml.is_null() {
            anyhow::bail!("Frontmatter is not a key/value mapping");
        }

        let status = StatusField::parse(scalar(&yaml[STATUS_KEY]).as_deref());
        let title = scalar(&yaml[TITLE_KEY]);
        let affected_files = match &yaml[AFFECTED_FILES_KEY] {
            serde_yaml::Value::Sequence(items) => items.iter().filter_map(scalar).collect(),
            other => scalar(other).into_iter().collect(),
        };

        Ok(Self {
            status,
            title,
            affected_files,
        })
    }
}

/// Render a YAML scalar as a string; `None` for null, empty and non-scalars.
fn scalar(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) if s.trim().is_empty() => None,
        serde_yaml::Value::String(s) => Some(s.trim().to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Render a new record document.
pub fn render_record(stage: Stage, title: &str, affected_files: &[String], body: &str) -> String {
    let mut out = String::new();
    out.push_str("---\n");
    out.push_str(&format!("{STATUS_KEY}: {stage}\n"));
    out.push_str(&format!("{TITLE_KEY}: {}\n", yaml_quote(title)));
    if affected_files.is_empty() {
        out.push_str(&format!("{AFFECTED_FILES_KEY}: []\n"));
    } else {
        out.push_str(&format!("{AFFECTED_FILES_KEY}:\n"));
        for file in affected_files {
            out.push_str(&format!("  - {}\n", yaml_quote(file)));
        }
    }
    out.push_str("---\n\n");
    out.push_str(&format!("# {title}\n"));
    if !body.trim().is_empty() {
        out.push('\n');
        out.push_str(body.trim_end());
        out.push('\n');
    }
    out
}

/// Quote a value only when plain YAML would misread it.
fn yaml_quote(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value.contains(": ")
        || value.contains(" #")
        || value.starts_with(|c: char| "-?:,[]{}#&*!|>'\"%@`~ ".contains(c))
        || value.ends_with(' ')
        || matches!(
            value.to_ascii_lowercase().as_str(),
            "true" | "false" | "yes" | "no" | "null" | "on" | "off"
        )
        || value.parse::<f64>().is_ok();

    if needs_quotes {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_header() {
        let content = "---\nstatus: building\ntitle: Add login\naffected-files:\n  - src/login.ts\n  - src/login.test.ts\n---\nbody";
        let header = RecordHeader::parse(content).unwrap();
        assert_eq!(header.status.stage(), Some(Stage::Building));
        assert_eq!(header.title.as_deref(), Some("Add login"));
        assert_eq!(
            header.affected_files,
            vec!["src/login.ts".to_string(), "src/login.test.ts".to_string()]
        );
    }

    #[test]
    fn test_parse_without_frontmatter_is_missing_status() {
        let header = RecordHeader::parse("# Pipeline dashboard\n\n| id | stage |").unwrap();
        assert_eq!(header.status, StatusField::Missing);
        assert!(header.affected_files.is_empty());
    }

    #[test]
    fn test_parse_header_without_status() {
        let header = RecordHeader::parse("---\ntitle: Index\n---\n").unwrap();
        assert_eq!(header.status, StatusField::Missing);
        assert_eq!(header.title.as_deref(), Some("Index"));
    }

    #[test]
    fn test_parse_invalid_status_value() {
        let header = RecordHeader::parse("---\nstatus: in-progress\n---\n").unwrap();
        assert_eq!(
            header.status,
            StatusField::Invalid("in-progress".to_string())
        );
    }

    #[test]
    fn test_parse_numeric_status_is_invalid() {
        let header = RecordHeader::parse("---\nstatus: 3\n---\n").unwrap();
        assert_eq!(header.status, StatusField::Invalid("3".to_string()));
    }

    #[test]
    fn test_parse_single_affected_file_scalar() {
        let header = RecordHeader::parse("---\nstatus: ready\naffected-files: src/a.rs\n---\n").unwrap();
        assert_eq!(header.affected_files, vec!["src/a.rs".to_string()]);
    }

    #[test]
    fn test_parse_unreadable_block_errors() {
        assert!(RecordHeader::parse("---\nstatus: [unclosed\n---\n").is_err());
        assert!(RecordHeader::parse("---\nstatus: ready\n").is_err());
    }

    #[test]
    fn test_render_round_trips_through_parse() {
        let files = vec!["src/x.ts".to_string(), "src/y.ts".to_string()];
        let doc = render_record(Stage::Ready, "Fix: login #2", &files, "Details here.");
        let header = RecordHeader::parse(&doc).unwrap();
        assert_eq!(header.status.stage(), Some(Stage::Ready));
        assert_eq!(header.title.as_deref(), Some("Fix: login #2"));
        assert_eq!(header.affected_files, files);
        assert!(doc.ends_with("Details here.\n"));
    }

    #[test]
    fn test_render_with_no_files() {
        let doc = render_record(Stage::Ready, "Docs", &[], "");
        assert!(doc.contains("affected-files: []"));
        let header = RecordHeader::parse(&doc).unwrap();
        assert!(header.affected_files.is_empty());
    }
}
