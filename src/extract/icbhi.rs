//! ICBHI 2017 extractor.
//!
//! Recordings are flat files named like `101_1b1_Al_sc_Meditron.wav`: the
//! first underscore token is the patient id, token 2 the chest location,
//! and tokens 4 onward the recording device. Patient-level diagnosis comes
//! from `patient_diagnosis.csv` (patient id, diagnosis text).

use crate::constants::{default_paths, sentinels};
use crate::error::{Error, Result};
use crate::extract::labels::map_icbhi_diagnosis;
use crate::extract::{ResolvedLabels, SourceAdapter, list_audio_files, stem_of};
use crate::metadata::{DiseaseLabel, Source};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extractor for the ICBHI 2017 collection shape.
pub struct IcbhiAdapter {
    /// Patient id to verbatim diagnosis text.
    diagnoses: HashMap<String, String>,
}

impl IcbhiAdapter {
    /// Load the patient diagnosis table from the collection root.
    ///
    /// A missing root is reported as such, not as an unreadable lookup
    /// table, matching the diagnostics the other sources produce.
    pub fn from_root(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::RawRootNotFound {
                path: root.to_path_buf(),
            });
        }
        let table_path = root.join(default_paths::ICBHI_DIAGNOSIS_FILE);
        Self::from_diagnosis_table(&table_path)
    }

    /// Load the patient diagnosis table from an explicit path.
    ///
    /// The table is read without a header row; published copies of the file
    /// start directly with data. A stray header row is harmless because its
    /// first field never matches a patient token.
    pub fn from_diagnosis_table(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| Error::LookupRead {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mut diagnoses = HashMap::new();
        for result in reader.records() {
            let record = result.map_err(|e| Error::LookupRead {
                path: path.to_path_buf(),
                source: e,
            })?;
            if let (Some(patient), Some(diagnosis)) = (record.get(0), record.get(1)) {
                diagnoses.insert(patient.to_string(), diagnosis.to_string());
            }
        }

        debug!("loaded {} patient diagnoses", diagnoses.len());
        Ok(Self { diagnoses })
    }
}

impl SourceAdapter for IcbhiAdapter {
    fn source(&self) -> Source {
        Source::Icbhi
    }

    fn discover(&self, root: &Path) -> Result<Vec<PathBuf>> {
        // Published ICBHI archives keep recordings under a subdirectory;
        // fall back to the root itself when it is absent.
        let audio_dir = root.join(default_paths::ICBHI_AUDIO_SUBDIR);
        if audio_dir.is_dir() {
            list_audio_files(&audio_dir)
        } else {
            list_audio_files(root)
        }
    }

    fn resolve(&self, recording: &Path) -> ResolvedLabels {
        let stem = stem_of(recording);
        let parts: Vec<&str> = stem.split('_').collect();
        let patient = parts.first().copied().unwrap_or_default();

        let diagnosis = self.diagnoses.get(patient);
        let disease_label = diagnosis
            .map_or(DiseaseLabel::Other, |text| map_icbhi_diagnosis(text));

        let chest_location = parts
            .get(2)
            .map_or_else(|| sentinels::UNKNOWN.to_string(), ToString::to_string);
        let recording_device = if parts.len() > 4 {
            parts[4..].join("_")
        } else {
            sentinels::UNKNOWN.to_string()
        };

        ResolvedLabels {
            patient_id: format!("{}_{patient}", Source::Icbhi.name()),
            disease_label,
            age: sentinels::AGE,
            sex: sentinels::SEX.to_string(),
            chest_location,
            recording_device,
            severity_level: sentinels::SEVERITY,
            original_label: diagnosis
                .cloned()
                .unwrap_or_else(|| sentinels::UNKNOWN.to_string()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn adapter_with(entries: &[(&str, &str)]) -> IcbhiAdapter {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patient_diagnosis.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        for (patient, diagnosis) in entries {
            writeln!(file, "{patient},{diagnosis}").unwrap();
        }
        drop(file);
        IcbhiAdapter::from_diagnosis_table(&path).unwrap()
    }

    #[test]
    fn test_resolve_full_filename() {
        let adapter = adapter_with(&[("101", "URTI"), ("102", "Healthy")]);
        let labels = adapter.resolve(Path::new("101_1b1_Al_sc_Meditron.wav"));

        assert_eq!(labels.patient_id, "ICBHI_101");
        assert_eq!(labels.disease_label, DiseaseLabel::Urti);
        assert_eq!(labels.chest_location, "Al");
        assert_eq!(labels.recording_device, "Meditron");
        assert_eq!(labels.original_label, "URTI");
        assert_eq!(labels.age, -1);
        assert_eq!(labels.sex, "Other");
        assert_eq!(labels.severity_level, -1);
    }

    #[test]
    fn test_resolve_multi_token_device_is_rejoined() {
        let adapter = adapter_with(&[("103", "COPD")]);
        let labels = adapter.resolve(Path::new("103_2b3_Pl_mc_AKGC417L_extra.wav"));

        assert_eq!(labels.disease_label, DiseaseLabel::Copd);
        assert_eq!(labels.recording_device, "AKGC417L_extra");
    }

    #[test]
    fn test_resolve_short_filename_uses_defaults() {
        let adapter = adapter_with(&[("101", "URTI")]);
        let labels = adapter.resolve(Path::new("999_1.wav"));

        assert_eq!(labels.patient_id, "ICBHI_999");
        assert_eq!(labels.disease_label, DiseaseLabel::Other);
        assert_eq!(labels.chest_location, "Unknown");
        assert_eq!(labels.recording_device, "Unknown");
        assert_eq!(labels.original_label, "Unknown");
    }

    #[test]
    fn test_unknown_diagnosis_text_falls_back_to_other() {
        let adapter = adapter_with(&[("105", "LRTI")]);
        let labels = adapter.resolve(Path::new("105_1b1_Tc_sc_Litt3200.wav"));

        assert_eq!(labels.disease_label, DiseaseLabel::Other);
        // Verbatim text is preserved for audit even when remapped
        assert_eq!(labels.original_label, "LRTI");
    }

    #[test]
    fn test_header_row_in_table_is_harmless() {
        let adapter = adapter_with(&[("patient_id", "diagnosis"), ("101", "Asthma")]);
        let labels = adapter.resolve(Path::new("101_1b1_Al_sc_Meditron.wav"));
        assert_eq!(labels.disease_label, DiseaseLabel::Asthma);
    }

    #[test]
    fn test_missing_diagnosis_table_is_fatal() {
        let result = IcbhiAdapter::from_diagnosis_table(Path::new("/nonexistent/diag.csv"));
        assert!(matches!(result, Err(Error::LookupRead { .. })));
    }

    #[test]
    fn test_missing_root_reports_missing_directory() {
        let result = IcbhiAdapter::from_root(Path::new("/nonexistent/icbhi"));
        assert!(matches!(result, Err(Error::RawRootNotFound { .. })));
    }
}
