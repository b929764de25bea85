mod transitions;
mod types;

#[cfg(test)]
mod tests;

pub use types::{Stage, StatusField, IDEATION_DIR, LEGACY_COMPLETED_STATUS};
