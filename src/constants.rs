//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config files and user-facing messages.
pub const APP_NAME: &str = "respcorpus";

/// Target sample rate for standardized audio in Hz.
pub const SAMPLE_RATE: u32 = 4000;

/// Target duration of standardized audio in seconds.
pub const DURATION_SEC: u32 = 5;

/// Exact sample count of every standardized signal.
pub const TARGET_SAMPLES: usize = (SAMPLE_RATE * DURATION_SEC) as usize;

/// Epsilon added to the peak when normalizing, so silent input stays
/// silent instead of dividing by zero.
pub const NORM_EPSILON: f32 = 1e-8;

/// Bit depth of standardized PCM output.
pub const BITS_PER_SAMPLE: u16 = 16;

/// Audio file extensions accepted during recording discovery.
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "flac", "mp3", "m4a", "aac"];

/// Output artifact names.
pub mod output_files {
    /// Subdirectory of the output root holding standardized audio.
    pub const AUDIO_DIR: &str = "audio";
    /// Combined metadata table filename.
    pub const COMBINED_METADATA: &str = "combined_metadata.csv";
}

/// Default raw dataset locations, relative to the working directory.
pub mod default_paths {
    /// ICBHI 2017 collection root.
    pub const ICBHI_DIR: &str = "data_raw/ICBHI";
    /// Folder-labeled Kaggle lung-sound collection root.
    pub const KAGGLE_DIR: &str = "data_raw/KAGGLE";
    /// RespiratoryDatabase@TR collection root.
    pub const RESP_TR_DIR: &str = "data_raw/RESP_TR";
    /// Output directory for the unified corpus.
    pub const OUTPUT_DIR: &str = "data_processed";
    /// ICBHI patient diagnosis table, relative to the ICBHI root.
    pub const ICBHI_DIAGNOSIS_FILE: &str = "patient_diagnosis.csv";
    /// ICBHI recordings subdirectory, relative to the ICBHI root.
    pub const ICBHI_AUDIO_SUBDIR: &str = "audio_and_txt_files";
    /// RESP_TR severity table, relative to the RESP_TR root.
    pub const RESP_TR_LABELS_FILE: &str = "metadata.csv";
}

/// Columns of the unified metadata schema, in output order.
pub const METADATA_COLUMNS: &[&str] = &[
    "sample_id",
    "patient_id",
    "source_dataset",
    "filepath",
    "disease_label",
    "age",
    "sex",
    "chest_location",
    "recording_device",
    "severity_level",
    "original_label",
];

/// Sentinel values for metadata fields absent from a source collection.
pub mod sentinels {
    /// Unknown age.
    pub const AGE: i32 = -1;
    /// Unknown sex.
    pub const SEX: &str = "Other";
    /// Unknown chest location or recording device.
    pub const UNKNOWN: &str = "Unknown";
    /// Severity not applicable or unknown.
    pub const SEVERITY: i32 = -1;
}
