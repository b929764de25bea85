//! Input validation for shepherd CLI arguments.
//!
//! Record ids and affected-file paths end up in file names and ownership
//! comparisons, so they are checked before anything touches the store.

use anyhow::{bail, Result};
use std::path::{Component, Path};

use crate::models::stage::Stage;

/// Maximum number of digits accepted in a record id.
pub const MAX_ID_DIGITS: usize = 9;

/// Maximum allowed length for record titles.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Parses a record id such as `7`, `007` or `0007`.
///
/// # Examples
///
/// ```
/// use shepherd::validation::parse_record_number;
///
/// assert_eq!(parse_record_number("007").unwrap(), 7);
/// assert!(parse_record_number("").is_err());
/// assert!(parse_record_number("../etc").is_err());
/// ```
pub fn parse_record_number(id: &str) -> Result<u32> {
    let id = id.trim();
    if id.is_empty() {
        bail!("Record id cannot be empty");
    }

    if !id.chars().all(|c| c.is_ascii_digit()) {
        bail!("Record id '{id}' must contain digits only (e.g. 007)");
    }

    let digits = id.trim_start_matches('0');
    if digits.len() > MAX_ID_DIGITS {
        bail!("Record id too long: {} digits (max {MAX_ID_DIGITS})", digits.len());
    }

    let number: u32 = if digits.is_empty() { 0 } else { digits.parse()? };
    if number == 0 {
        bail!("Record id must be greater than zero");
    }

    Ok(number)
}

/// Validates a record title.
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        bail!("Title cannot be empty");
    }

    if title.len() > MAX_TITLE_LENGTH {
        bail!(
            "Title too long: {} characters (max {MAX_TITLE_LENGTH})",
            title.len()
        );
    }

    if title.contains('\n') {
        bail!("Title must be a single line");
    }

    Ok(())
}

/// Validates that an affected-file entry is a repository-relative path.
pub fn validate_relative_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        bail!("File path cannot be empty");
    }

    let p = Path::new(path);
    if p.is_absolute() {
        bail!("File path '{path}' must be relative to the repository root");
    }

    if p.components().any(|c| matches!(c, Component::ParentDir)) {
        bail!("File path '{path}' must not escape the repository with '..'");
    }

    Ok(())
}

/// Clap value parser for record id arguments.
pub fn clap_record_id_validator(s: &str) -> Result<String, String> {
    parse_record_number(s).map_err(|e| e.to_string())?;
    Ok(s.trim().to_string())
}

/// Clap value parser for affected-file arguments.
pub fn clap_path_validator(s: &str) -> Result<String, String> {
    validate_relative_path(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}

/// Clap value parser for stage arguments (`done` is accepted for completed).
pub fn clap_stage_validator(s: &str) -> Result<Stage, String> {
    s.parse::<Stage>().map_err(|e| e.to_string())
}
