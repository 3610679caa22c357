//! Spreadsheet-labeled extractor (RespiratoryDatabase@TR shape).
//!
//! Recordings are discovered recursively; filenames look like
//! `COPD3_patient_001_AL.wav`: the first underscore token is a
//! severity/diagnosis class, an optional patient number follows a literal
//! `patient` token, and the last token is the chest location. A severity
//! table (patient id, severity string) overrides the filename class token
//! when the patient is listed.

use crate::constants::{default_paths, sentinels};
use crate::error::{Error, Result};
use crate::extract::labels::classify_severity;
use crate::extract::{ResolvedLabels, SourceAdapter, collect_audio_files_recursive, stem_of};
use crate::metadata::Source;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Filename token that introduces a patient number.
const PATIENT_MARKER: &str = "patient";

/// Recording device used throughout RespiratoryDatabase@TR.
const RECORDING_DEVICE: &str = "Littmann_3200";

/// Extractor for the severity-table-labeled collection shape.
pub struct SeverityAdapter {
    /// Patient number to authoritative severity string.
    severities: HashMap<String, String>,
}

impl SeverityAdapter {
    /// Load the severity table conventionally located in the collection
    /// root. A missing table is tolerated (filename classes apply
    /// unmodified); a present but unreadable one is fatal.
    pub fn from_root(root: &Path) -> Result<Self> {
        let table_path = root.join(default_paths::RESP_TR_LABELS_FILE);
        if table_path.is_file() {
            Self::from_severity_table(&table_path)
        } else {
            warn!(
                "severity table not found at {}, using filename classes only",
                table_path.display()
            );
            Ok(Self {
                severities: HashMap::new(),
            })
        }
    }

    /// Load the severity table from an explicit path.
    ///
    /// Expects a header row followed by (patient id, severity string)
    /// columns; columns are taken positionally so header naming does not
    /// matter.
    pub fn from_severity_table(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| Error::LookupRead {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mut severities = HashMap::new();
        for result in reader.records() {
            let record = result.map_err(|e| Error::LookupRead {
                path: path.to_path_buf(),
                source: e,
            })?;
            if let (Some(patient), Some(severity)) = (record.get(0), record.get(1)) {
                severities.insert(patient.to_string(), severity.to_string());
            }
        }

        debug!("loaded {} patient severities", severities.len());
        Ok(Self { severities })
    }
}

impl SourceAdapter for SeverityAdapter {
    fn source(&self) -> Source {
        Source::RespTr
    }

    fn discover(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut recordings = Vec::new();
        collect_audio_files_recursive(root, &mut recordings)?;
        recordings.sort();
        Ok(recordings)
    }

    fn resolve(&self, recording: &Path) -> ResolvedLabels {
        let stem = stem_of(recording);
        let parts: Vec<&str> = stem.split('_').collect();

        let mut class = parts.first().copied().unwrap_or_default().to_string();

        let mut patient_num = "0".to_string();
        if let Some(idx) = parts.iter().position(|p| *p == PATIENT_MARKER) {
            if let Some(num) = parts.get(idx + 1) {
                patient_num = (*num).to_string();
            }
        }

        let chest_location = if parts.len() > 1 {
            parts.last().map_or_else(
                || sentinels::UNKNOWN.to_string(),
                |loc| (*loc).to_string(),
            )
        } else {
            sentinels::UNKNOWN.to_string()
        };

        // Authoritative severity from the table wins over the filename
        if let Some(severity) = self.severities.get(&patient_num) {
            class = severity.clone();
        }

        let (disease_label, severity_level) = classify_severity(&class);

        ResolvedLabels {
            patient_id: format!("{}_{patient_num}", Source::RespTr.name()),
            disease_label,
            age: sentinels::AGE,
            sex: sentinels::SEX.to_string(),
            chest_location,
            recording_device: RECORDING_DEVICE.to_string(),
            severity_level,
            original_label: class,
        }
    }
}
