//! Source extractors.
//!
//! Each raw collection encodes its labels differently; a [`SourceAdapter`]
//! captures that shape (how to discover recordings and how to resolve the
//! label-derived fields), while [`extract`] is the shared driver loop that
//! standardizes audio, assigns ids, and builds the per-source table.

mod folder;
mod icbhi;
mod labels;
mod severity;

pub use folder::FolderAdapter;
pub use icbhi::IcbhiAdapter;
pub use labels::{classify_severity, map_folder_label, map_icbhi_diagnosis};
pub use severity::SeverityAdapter;

use crate::audio;
use crate::constants::AUDIO_EXTENSIONS;
use crate::constants::output_files::AUDIO_DIR;
use crate::error::{Error, Result};
use crate::metadata::{DiseaseLabel, Source, SourceTable, UnifiedMetadataRecord};
use crate::progress;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Label-derived fields resolved for one recording, before audio
/// standardization.
#[derive(Debug, Clone)]
pub struct ResolvedLabels {
    /// Source-prefixed patient identifier.
    pub patient_id: String,
    /// Normalized disease label.
    pub disease_label: DiseaseLabel,
    /// Patient age, `-1` when unknown.
    pub age: i32,
    /// Patient sex, `"Other"` when unknown.
    pub sex: String,
    /// Chest auscultation location.
    pub chest_location: String,
    /// Recording device.
    pub recording_device: String,
    /// COPD severity stage, `-1` when not applicable.
    pub severity_level: i32,
    /// Verbatim source label.
    pub original_label: String,
}

/// Strategy for one raw collection shape.
pub trait SourceAdapter {
    /// Which source collection this adapter handles.
    fn source(&self) -> Source;

    /// Discover recordings under the collection root, in deterministic
    /// order.
    fn discover(&self, root: &Path) -> Result<Vec<PathBuf>>;

    /// Resolve the label-derived fields for one recording.
    ///
    /// Never fails: unresolved labels fall back to the documented defaults.
    fn resolve(&self, recording: &Path) -> ResolvedLabels;
}

/// Run one extractor: standardize every discovered recording and build the
/// source table.
///
/// Sample ids increment only on successful standardization, so they stay
/// contiguous even when recordings are skipped. A failed recording produces
/// no record and no output file.
pub fn extract(
    adapter: &dyn SourceAdapter,
    raw_root: &Path,
    output_audio_dir: &Path,
    progress_enabled: bool,
) -> Result<SourceTable> {
    if !raw_root.is_dir() {
        return Err(Error::RawRootNotFound {
            path: raw_root.to_path_buf(),
        });
    }
    std::fs::create_dir_all(output_audio_dir)?;

    let source = adapter.source();
    let recordings = adapter.discover(raw_root)?;
    info!("{source}: found {} recording(s)", recordings.len());

    let bar = progress::create_recording_progress(recordings.len(), progress_enabled);
    let mut table = SourceTable::new(source);
    let mut counter: u32 = 1;
    let mut failed = 0usize;

    for recording in &recordings {
        let audio_filename = source.audio_filename(counter);
        let output_path = output_audio_dir.join(&audio_filename);

        if let Err(e) = audio::standardize(recording, &output_path) {
            warn!("{source}: skipping {}: {e}", recording.display());
            failed += 1;
            progress::inc_progress(bar.as_ref());
            continue;
        }

        let labels = adapter.resolve(recording);
        table.records.push(UnifiedMetadataRecord {
            sample_id: source.sample_id(counter),
            patient_id: labels.patient_id,
            source_dataset: source,
            filepath: format!("{AUDIO_DIR}/{audio_filename}"),
            disease_label: labels.disease_label,
            age: labels.age,
            sex: labels.sex,
            chest_location: labels.chest_location,
            recording_device: labels.recording_device,
            severity_level: labels.severity_level,
            original_label: labels.original_label,
        });
        counter += 1;
        progress::inc_progress(bar.as_ref());
    }

    progress::finish_progress(bar, "done");
    info!(
        "{source}: processed {} recording(s), skipped {failed}",
        table.len()
    );
    Ok(table)
}

/// Whether a path looks like an audio file we can feed to the decoder.
fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            AUDIO_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// List audio files directly inside `dir`, sorted by path.
fn list_audio_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_audio_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Recursively collect audio files under `dir`, sorted by path.
fn collect_audio_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_audio_files_recursive(&path, files)?;
        } else if is_audio_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// File stem as a lossy UTF-8 string.
fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::cast_precision_loss)]
mod tests {
    use super::*;
    use crate::constants::{SAMPLE_RATE, sentinels};
    use hound::{SampleFormat, WavSpec, WavWriter};
    use tempfile::TempDir;

    struct FixedAdapter;

    impl SourceAdapter for FixedAdapter {
        fn source(&self) -> Source {
            Source::Kaggle
        }

        fn discover(&self, root: &Path) -> Result<Vec<PathBuf>> {
            list_audio_files(root)
        }

        fn resolve(&self, recording: &Path) -> ResolvedLabels {
            ResolvedLabels {
                patient_id: format!("KAGGLE_{}", stem_of(recording)),
                disease_label: DiseaseLabel::Normal,
                age: sentinels::AGE,
                sex: sentinels::SEX.to_string(),
                chest_location: sentinels::UNKNOWN.to_string(),
                recording_device: sentinels::UNKNOWN.to_string(),
                severity_level: sentinels::SEVERITY,
                original_label: "healthy".to_string(),
            }
        }
    }

    fn write_tone(path: &Path) {
        let spec = WavSpec {
            channels: 1,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for i in 0..4000 {
            let s = ((i as f32 * 0.05).sin() * 10_000.0) as i16;
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_ids_stay_contiguous_across_failures() {
        let raw = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        write_tone(&raw.path().join("a.wav"));
        std::fs::write(raw.path().join("b.wav"), b"definitely not audio").unwrap();
        write_tone(&raw.path().join("c.wav"));

        let table = extract(&FixedAdapter, raw.path(), out.path(), false).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].sample_id, "KAGGLE_000001");
        assert_eq!(table.records[1].sample_id, "KAGGLE_000002");
        assert_eq!(table.records[0].patient_id, "KAGGLE_a");
        assert_eq!(table.records[1].patient_id, "KAGGLE_c");

        // Exactly the two successful outputs exist
        assert!(out.path().join("KAGGLE_000001.wav").exists());
        assert!(out.path().join("KAGGLE_000002.wav").exists());
        assert!(!out.path().join("KAGGLE_000003.wav").exists());
    }

    #[test]
    fn test_filepath_is_relative_to_output_root() {
        let raw = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_tone(&raw.path().join("only.wav"));

        let table = extract(&FixedAdapter, raw.path(), out.path(), false).unwrap();
        assert_eq!(table.records[0].filepath, "audio/KAGGLE_000001.wav");
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let out = TempDir::new().unwrap();
        let result = extract(
            &FixedAdapter,
            Path::new("/nonexistent/raw"),
            out.path(),
            false,
        );
        assert!(matches!(result, Err(Error::RawRootNotFound { .. })));
    }

    #[test]
    fn test_is_audio_file_extension_filter() {
        assert!(is_audio_file(Path::new("x/y.wav")));
        assert!(is_audio_file(Path::new("x/y.WAV")));
        assert!(is_audio_file(Path::new("x/y.flac")));
        assert!(!is_audio_file(Path::new("x/y.txt")));
        assert!(!is_audio_file(Path::new("x/noext")));
    }
}
