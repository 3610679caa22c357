//! Unified metadata schema and table persistence.

mod record;
mod table;

pub use record::{DiseaseLabel, Source, UnifiedMetadataRecord};
pub use table::{SourceTable, read_table, write_table};
