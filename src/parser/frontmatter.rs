use anyhow::{bail, Context, Result};

/// Frontmatter delimiter line.
pub const DELIMITER: &str = "---";

/// Locate the opening and closing delimiter lines of a frontmatter block.
///
/// The opening delimiter must be the first line. The closing delimiter must
/// sit at the same indentation as the opening one, so a `---` embedded in an
/// indented YAML block scalar is not mistaken for the end of the header.
///
/// Returns `None` when the content has no (closed) frontmatter block.
pub fn frontmatter_bounds(lines: &[&str]) -> Option<(usize, usize)> {
    let first = lines.first()?;
    if !first.trim().starts_with(DELIMITER) {
        return None;
    }

    let opening_indent = first.len() - first.trim_start().len();

    lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| {
            let trimmed = line.trim_start();
            trimmed.starts_with(DELIMITER) && line.len() - trimmed.len() == opening_indent
        })
        .map(|(idx, _)| (0, idx))
}

/// Whether the content starts with a frontmatter delimiter at all.
pub fn has_frontmatter(content: &str) -> bool {
    content
        .lines()
        .next()
        .is_some_and(|line| line.trim().starts_with(DELIMITER))
}

/// Extract YAML frontmatter from markdown content
///
/// Expects frontmatter delimited by `---` at the start and end.
/// Returns the parsed YAML as a `serde_yaml::Value`.
///
/// ```text
/// ---
/// status: ready
/// title: Add login form
/// ---
/// # Body
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - Content is empty or missing opening `---`
/// - Closing `---` is not found
/// - YAML content cannot be parsed
pub fn extract_yaml_frontmatter(content: &str) -> Result<serde_yaml::Value> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.is_empty() || !lines[0].trim().starts_with(DELIMITER) {
        bail!("No frontmatter delimiter found at start of content");
    }

    let (open_idx, close_idx) = frontmatter_bounds(&lines)
        .ok_or_else(|| anyhow::anyhow!("Frontmatter not properly closed with ---"))?;

    let yaml_content = lines[open_idx + 1..close_idx].join("\n");
    if yaml_content.trim().is_empty() {
        return Ok(serde_yaml::Value::Mapping(serde_yaml::Mapping::new()));
    }

    serde_yaml::from_str(&yaml_content).context("Failed to parse YAML frontmatter")
}

/// Rewrite a single top-level scalar field inside the frontmatter block.
///
/// Only the line holding `field:` is touched; every other byte of the
/// document, including line endings and the body, is preserved. If the field
/// is absent it is inserted directly after the opening delimiter.
///
/// # Errors
///
/// Returns an error if the content has no closed frontmatter block.
pub fn rewrite_frontmatter_field(content: &str, field: &str, value: &str) -> Result<String> {
    let lines: Vec<&str> = content.lines().collect();
    let (open_idx, close_idx) = frontmatter_bounds(&lines)
        .ok_or_else(|| anyhow::anyhow!("No closed frontmatter block to rewrite"))?;

    let prefix = format!("{field}:");
    let mut out = String::with_capacity(content.len() + field.len() + value.len() + 4);
    let mut replaced = false;

    // split_inclusive keeps each line's own terminator (\n or \r\n)
    for (idx, raw_line) in content.split_inclusive('\n').enumerate() {
        let body = raw_line.trim_end_matches(['\n', '\r']);
        let ending = &raw_line[body.len()..];

        let is_field_line = idx > open_idx
            && idx < close_idx
            && !replaced
            && body.starts_with(&prefix);

        if is_field_line {
            out.push_str(&format!("{field}: {value}"));
            out.push_str(ending);
            replaced = true;
        } else {
            out.push_str(raw_line);
        }

        if idx == open_idx && !field_present(&lines[open_idx + 1..close_idx], &prefix) {
            let newline = if ending.is_empty() { "\n" } else { ending };
            if ending.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("{field}: {value}{newline}"));
            replaced = true;
        }
    }

    Ok(out)
}

fn field_present(header_lines: &[&str], prefix: &str) -> bool {
    header_lines.iter().any(|line| line.starts_with(prefix))
}
