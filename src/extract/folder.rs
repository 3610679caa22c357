//! Folder-labeled extractor (Kaggle lung-sound collection shape).
//!
//! Recordings are grouped into one subdirectory per disease; the folder
//! name is the only label the source carries. No patient, device, or
//! location metadata exists, so those fields get sentinel values and the
//! patient id is synthesized from folder plus file stem to keep provenance
//! traceable without implying real patient linkage.

use crate::constants::sentinels;
use crate::error::Result;
use crate::extract::labels::map_folder_label;
use crate::extract::{ResolvedLabels, SourceAdapter, list_audio_files, stem_of};
use crate::metadata::Source;
use std::path::{Path, PathBuf};

/// Extractor for folder-labeled collections.
pub struct FolderAdapter;

impl FolderAdapter {
    /// Lowercased name of the disease folder containing a recording.
    fn folder_name(recording: &Path) -> String {
        recording
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }
}

impl SourceAdapter for FolderAdapter {
    fn source(&self) -> Source {
        Source::Kaggle
    }

    fn discover(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut folders = Vec::new();
        for entry in std::fs::read_dir(root)? {
            let path = entry?.path();
            if path.is_dir() {
                folders.push(path);
            }
        }
        folders.sort();

        let mut recordings = Vec::new();
        for folder in folders {
            recordings.extend(list_audio_files(&folder)?);
        }
        Ok(recordings)
    }

    fn resolve(&self, recording: &Path) -> ResolvedLabels {
        let folder = Self::folder_name(recording);
        let disease_label = map_folder_label(&folder);

        ResolvedLabels {
            patient_id: format!(
                "{}_{folder}_{}",
                Source::Kaggle.name(),
                stem_of(recording)
            ),
            disease_label,
            age: sentinels::AGE,
            sex: sentinels::SEX.to_string(),
            chest_location: sentinels::UNKNOWN.to_string(),
            recording_device: sentinels::UNKNOWN.to_string(),
            severity_level: sentinels::SEVERITY,
            original_label: folder,
        }
    }
}
