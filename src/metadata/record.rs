//! The unified metadata schema shared by all source collections.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source collection a recording came from.
///
/// The stable name doubles as the `source_dataset` column value, the
/// per-source sample-id prefix, and the standardized-audio filename prefix.
/// Distinct prefixes keep output filenames disjoint across sources, so the
/// three extractors can share one audio directory without collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// ICBHI 2017 respiratory sound database.
    #[serde(rename = "ICBHI")]
    Icbhi,
    /// Folder-labeled Kaggle lung-sound collection.
    #[serde(rename = "KAGGLE")]
    Kaggle,
    /// RespiratoryDatabase@TR.
    #[serde(rename = "RESP_TR")]
    RespTr,
}

impl Source {
    /// All sources in pipeline processing order.
    pub const ALL: [Self; 3] = [Self::Icbhi, Self::Kaggle, Self::RespTr];

    /// Stable uppercase name of the source.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Icbhi => "ICBHI",
            Self::Kaggle => "KAGGLE",
            Self::RespTr => "RESP_TR",
        }
    }

    /// Sample id for the `counter`-th successfully processed recording.
    pub fn sample_id(self, counter: u32) -> String {
        format!("{}_{counter:06}", self.name())
    }

    /// Standardized-audio filename for the `counter`-th recording.
    pub fn audio_filename(self, counter: u32) -> String {
        format!("{}_{counter:06}.wav", self.name())
    }

    /// Per-source metadata table filename, e.g. `meta_icbhi.csv`.
    pub fn meta_filename(self) -> String {
        format!("meta_{}.csv", self.name().to_lowercase())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed disease label vocabulary.
///
/// Every source-specific diagnosis text is normalized into one of these;
/// anything unrecognized falls back to [`DiseaseLabel::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiseaseLabel {
    /// Chronic obstructive pulmonary disease. The only label that carries
    /// a severity level.
    #[serde(rename = "COPD")]
    Copd,
    /// Asthma.
    Asthma,
    /// Pneumonia.
    Pneumonia,
    /// Bronchiectasis.
    Bronchiectasis,
    /// Bronchiolitis.
    Bronchiolitis,
    /// Upper respiratory tract infection.
    #[serde(rename = "URTI")]
    Urti,
    /// Healthy lung sounds.
    Normal,
    /// Catch-all for unmapped or unknown diagnoses.
    Other,
}

impl DiseaseLabel {
    /// All labels in vocabulary order.
    pub const ALL: [Self; 8] = [
        Self::Copd,
        Self::Asthma,
        Self::Pneumonia,
        Self::Bronchiectasis,
        Self::Bronchiolitis,
        Self::Urti,
        Self::Normal,
        Self::Other,
    ];

    /// Canonical string form, as written to metadata tables.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Copd => "COPD",
            Self::Asthma => "Asthma",
            Self::Pneumonia => "Pneumonia",
            Self::Bronchiectasis => "Bronchiectasis",
            Self::Bronchiolitis => "Bronchiolitis",
            Self::Urti => "URTI",
            Self::Normal => "Normal",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for DiseaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the unified metadata schema, describing one standardized
/// recording.
///
/// Field order matches the on-disk column order exactly. `sample_id` is
/// unique within its source at creation and rewritten to a globally unique
/// id by the merge step; no other field is ever mutated after extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedMetadataRecord {
    /// Source-prefixed sequential id, rewritten to `UNIFIED_NNNNNN` on merge.
    pub sample_id: String,
    /// Source-prefixed patient identifier (synthesized when the source has
    /// no real patient linkage).
    pub patient_id: String,
    /// Source collection this recording came from.
    pub source_dataset: Source,
    /// Path of the standardized WAV, relative to the output root.
    pub filepath: String,
    /// Normalized disease label.
    pub disease_label: DiseaseLabel,
    /// Patient age, `-1` when unknown.
    pub age: i32,
    /// Patient sex, `"Other"` when unknown.
    pub sex: String,
    /// Chest auscultation location, `"Unknown"` when absent.
    pub chest_location: String,
    /// Recording device, `"Unknown"` when absent.
    pub recording_device: String,
    /// COPD severity stage, `-1` when not applicable.
    pub severity_level: i32,
    /// Verbatim source label, kept for audit and traceability.
    pub original_label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_names_are_disjoint_prefixes() {
        let names: Vec<&str> = Source::ALL.iter().map(|s| s.name()).collect();
        for (i, a) in names.iter().enumerate() {
            for (j, b) in names.iter().enumerate() {
                if i != j {
                    assert!(!a.starts_with(b));
                }
            }
        }
    }

    #[test]
    fn test_sample_id_zero_padding() {
        assert_eq!(Source::Icbhi.sample_id(1), "ICBHI_000001");
        assert_eq!(Source::RespTr.sample_id(123_456), "RESP_TR_123456");
    }

    #[test]
    fn test_audio_filename_matches_sample_id() {
        assert_eq!(Source::Kaggle.audio_filename(7), "KAGGLE_000007.wav");
    }

    #[test]
    fn test_meta_filename() {
        assert_eq!(Source::Icbhi.meta_filename(), "meta_icbhi.csv");
        assert_eq!(Source::RespTr.meta_filename(), "meta_resp_tr.csv");
    }

    #[test]
    fn test_disease_label_roundtrip_strings() {
        for label in DiseaseLabel::ALL {
            assert!(!label.as_str().is_empty());
        }
        assert_eq!(DiseaseLabel::Copd.as_str(), "COPD");
        assert_eq!(DiseaseLabel::Urti.as_str(), "URTI");
    }
}
