pub mod frontmatter;
pub mod header;

pub use header::{render_record, RecordHeader};
