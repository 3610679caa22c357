//! Error types for respcorpus.
//!
//! Two categories: [`Error`] is fatal for the whole pipeline run
//! (configuration, lookup tables, metadata persistence, schema violations),
//! while [`AudioError`] is local to a single recording and is caught by the
//! extractor driver, which logs the failure and moves on.

/// Result type alias for respcorpus operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal pipeline error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Raw collection root does not exist.
    #[error("raw dataset directory does not exist: {path}")]
    RawRootNotFound {
        /// Path to the missing directory.
        path: std::path::PathBuf,
    },

    /// Failed to read a label lookup table.
    #[error("failed to read lookup table '{path}'")]
    LookupRead {
        /// Path to the lookup table.
        path: std::path::PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Failed to write a metadata table.
    #[error("failed to write metadata table '{path}'")]
    MetadataWrite {
        /// Path to the metadata table.
        path: std::path::PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Failed to read a metadata table.
    #[error("failed to read metadata table '{path}'")]
    MetadataRead {
        /// Path to the metadata table.
        path: std::path::PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Metadata table does not match the unified schema.
    ///
    /// Indicates an upstream contract violation; the merge step never
    /// recovers from this.
    #[error("metadata table '{path}' violates the unified schema: {message}")]
    SchemaMismatch {
        /// Path to the offending table.
        path: std::path::PathBuf,
        /// Description of the mismatch.
        message: String,
    },
}

/// Per-recording audio processing error.
///
/// Raised by the standardizer for any decode, resample, or encode failure.
/// Callers never branch on the variant: every `AudioError` means "skip this
/// recording and continue".
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// Failed to open or probe the audio file.
    #[error("failed to open audio file '{path}'")]
    Open {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to decode audio packets.
    #[error("failed to decode audio from '{path}'")]
    Decode {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No audio tracks found in the container.
    #[error("no audio tracks found in '{path}'")]
    NoAudioTracks {
        /// Path to the audio file.
        path: std::path::PathBuf,
    },

    /// Failed to resample audio.
    #[error("failed to resample audio: {reason}")]
    Resample {
        /// Description of the resampling failure.
        reason: String,
    },

    /// Failed to encode or write the standardized WAV file.
    #[error("failed to write WAV file '{path}'")]
    Encode {
        /// Path to the WAV file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
