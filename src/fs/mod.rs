pub mod locking;
pub mod record_files;
pub mod store;

pub use store::{DocumentStore, StageListing, UnreadableRecord, DEFAULT_STORE_DIR};
