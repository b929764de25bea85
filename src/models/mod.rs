pub mod record;
pub mod stage;

pub use record::{FeatureRecord, RecordId};
pub use stage::{Stage, StatusField};
