//! Configuration loading and path resolution.
//!
//! Resolution order: CLI flag, then config file value, then built-in
//! default. The config file is optional; an explicitly passed path must
//! exist and parse, while the conventional `respcorpus.toml` in the working
//! directory is picked up only when present.

use crate::cli::Cli;
use crate::constants::{APP_NAME, default_paths};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Contents of the optional TOML config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Dataset and output locations.
    pub paths: PathsSection,
}

/// `[paths]` section of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    /// Root of the raw ICBHI collection.
    pub icbhi_dir: Option<PathBuf>,
    /// Root of the raw folder-labeled Kaggle collection.
    pub kaggle_dir: Option<PathBuf>,
    /// Root of the raw RespiratoryDatabase@TR collection.
    pub resp_tr_dir: Option<PathBuf>,
    /// Severity lookup table for RESP_TR.
    pub resp_tr_labels: Option<PathBuf>,
    /// Output directory for the unified corpus.
    pub output_dir: Option<PathBuf>,
}

/// Fully resolved, immutable pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root of the raw ICBHI collection.
    pub icbhi_dir: PathBuf,
    /// Root of the raw folder-labeled Kaggle collection.
    pub kaggle_dir: PathBuf,
    /// Root of the raw RespiratoryDatabase@TR collection.
    pub resp_tr_dir: PathBuf,
    /// Severity lookup table for RESP_TR, when explicitly configured.
    pub resp_tr_labels: Option<PathBuf>,
    /// Output directory for the unified corpus.
    pub output_dir: PathBuf,
}

impl PipelineConfig {
    /// Resolve the effective configuration from CLI flags and file values.
    pub fn resolve(cli: &Cli, file: &FileConfig) -> Self {
        let paths = &file.paths;
        Self {
            icbhi_dir: pick(
                cli.icbhi_dir.as_ref(),
                paths.icbhi_dir.as_ref(),
                default_paths::ICBHI_DIR,
            ),
            kaggle_dir: pick(
                cli.kaggle_dir.as_ref(),
                paths.kaggle_dir.as_ref(),
                default_paths::KAGGLE_DIR,
            ),
            resp_tr_dir: pick(
                cli.resp_tr_dir.as_ref(),
                paths.resp_tr_dir.as_ref(),
                default_paths::RESP_TR_DIR,
            ),
            resp_tr_labels: cli
                .resp_tr_labels
                .clone()
                .or_else(|| paths.resp_tr_labels.clone()),
            output_dir: pick(
                cli.output_dir.as_ref(),
                paths.output_dir.as_ref(),
                default_paths::OUTPUT_DIR,
            ),
        }
    }

    /// Directory the standardized audio is written to.
    pub fn audio_dir(&self) -> PathBuf {
        self.output_dir
            .join(crate::constants::output_files::AUDIO_DIR)
    }
}

fn pick(cli: Option<&PathBuf>, file: Option<&PathBuf>, default: &str) -> PathBuf {
    cli.or(file)
        .cloned()
        .unwrap_or_else(|| PathBuf::from(default))
}

/// Load the config file named by `path`, or the conventional
/// `respcorpus.toml` when present, or defaults.
pub fn load_file(path: Option<&Path>) -> Result<FileConfig> {
    match path {
        Some(explicit) => read_config_file(explicit),
        None => {
            let conventional = PathBuf::from(format!("{APP_NAME}.toml"));
            if conventional.is_file() {
                read_config_file(&conventional)
            } else {
                Ok(FileConfig::default())
            }
        }
    }
}

fn read_config_file(path: &Path) -> Result<FileConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })
}
