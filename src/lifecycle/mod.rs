//! Lifecycle orchestration over the document store.
//!
//! Every operation here rebuilds its view from disk; nothing is held
//! between calls.

pub mod intake;
pub mod ownership;
pub mod resolver;
pub mod stuck;
pub mod transition;

pub use intake::create_feature;
pub use ownership::{check_ownership, claims_overlap, OwnershipConflict};
pub use resolver::{
    consistency_scan, directive_for, ensure_consistent, find_pending_work, status_report,
    PendingWork, StatusReport, Violation, WORK_PRIORITY,
};
pub use stuck::{check_stuck, check_stuck_at, StuckRecord, DEFAULT_STUCK_THRESHOLD_MINUTES};
pub use transition::{transition, TransitionOutcome};
