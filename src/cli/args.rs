//! CLI argument definitions.

use clap::Parser;
use std::path::PathBuf;

/// Unify heterogeneous respiratory sound datasets into a single corpus.
///
/// Runs the three source extractors (ICBHI, folder-labeled Kaggle,
/// RespiratoryDatabase@TR) and merges their metadata into one table.
#[derive(Debug, Parser)]
#[command(name = "respcorpus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML config file (flags override file values).
    #[arg(short, long, env = "RESPCORPUS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Root of the raw ICBHI 2017 collection.
    #[arg(long)]
    pub icbhi_dir: Option<PathBuf>,

    /// Root of the raw folder-labeled Kaggle collection.
    #[arg(long)]
    pub kaggle_dir: Option<PathBuf>,

    /// Root of the raw RespiratoryDatabase@TR collection.
    #[arg(long)]
    pub resp_tr_dir: Option<PathBuf>,

    /// Severity lookup table for RESP_TR (defaults to metadata.csv in its
    /// root).
    #[arg(long)]
    pub resp_tr_labels: Option<PathBuf>,

    /// Output directory for standardized audio and metadata tables.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except warnings and errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable progress bars.
    #[arg(long)]
    pub no_progress: bool,
}
