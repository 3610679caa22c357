//! Metadata table persistence.
//!
//! Tables are plain CSV with the unified column set. Reading validates the
//! header against the schema before deserializing any row: a missing or
//! renamed column is an upstream contract violation and aborts the merge.

use crate::constants::METADATA_COLUMNS;
use crate::error::{Error, Result};
use crate::metadata::{Source, UnifiedMetadataRecord};
use std::path::Path;

/// Ordered records extracted from a single source collection.
#[derive(Debug, Clone)]
pub struct SourceTable {
    /// Source collection the records came from.
    pub source: Source,
    /// One record per successfully processed recording, in insertion order.
    pub records: Vec<UnifiedMetadataRecord>,
}

impl SourceTable {
    /// Create an empty table for a source.
    pub const fn new(source: Source) -> Self {
        Self {
            source,
            records: Vec::new(),
        }
    }

    /// Number of records in the table.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Write records as a CSV table with the unified header.
///
/// The header is written explicitly so that even an empty table carries the
/// schema.
pub fn write_table(path: &Path, records: &[UnifiedMetadataRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| Error::MetadataWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

    writer
        .write_record(METADATA_COLUMNS)
        .map_err(|e| Error::MetadataWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

    for record in records {
        writer.serialize(record).map_err(|e| Error::MetadataWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    writer.flush()?;
    Ok(())
}

/// Read back a persisted metadata table, validating the schema first.
pub fn read_table(path: &Path) -> Result<Vec<UnifiedMetadataRecord>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| Error::MetadataRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate_header(path, &mut reader)?;

    let mut records = Vec::new();
    for result in reader.deserialize::<UnifiedMetadataRecord>() {
        let record = result.map_err(|e| Error::SchemaMismatch {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        records.push(record);
    }

    Ok(records)
}

fn validate_header(path: &Path, reader: &mut csv::Reader<std::fs::File>) -> Result<()> {
    let headers = reader.headers().map_err(|e| Error::MetadataRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let found: Vec<&str> = headers.iter().collect();
    if found != METADATA_COLUMNS {
        return Err(Error::SchemaMismatch {
            path: path.to_path_buf(),
            message: format!(
                "expected columns [{}], found [{}]",
                METADATA_COLUMNS.join(", "),
                found.join(", ")
            ),
        });
    }

    Ok(())
}
