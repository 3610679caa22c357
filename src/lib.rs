//! respcorpus - respiratory sound dataset unification pipeline.
//!
//! Ingests three heterogeneously structured respiratory-sound collections
//! and produces a single corpus: one standardized WAV per recording plus
//! one metadata row per recording in a common schema.

#![warn(missing_docs)]

pub mod audio;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod merge;
pub mod metadata;
pub mod progress;

use clap::Parser;
use cli::Cli;
use config::PipelineConfig;
use extract::{FolderAdapter, IcbhiAdapter, SeverityAdapter, SourceAdapter};
use metadata::SourceTable;
use std::path::Path;
use tracing::info;

pub use error::{AudioError, Error, Result};

/// Main entry point for the respcorpus CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let file_config = config::load_file(cli.config.as_deref())?;
    let config = PipelineConfig::resolve(&cli, &file_config);

    let progress_enabled = !cli.quiet && !cli.no_progress;
    run_pipeline(&config, progress_enabled)
}

/// Run the full pipeline: the three extractors in fixed order, then the
/// merge.
///
/// The order is part of the output contract: combined sample ids are
/// assigned by row order, so reordering sources would re-identify every
/// record.
pub fn run_pipeline(config: &PipelineConfig, progress_enabled: bool) -> Result<()> {
    let audio_dir = config.audio_dir();
    std::fs::create_dir_all(&audio_dir)?;

    info!("[step 1/4] processing ICBHI 2017");
    let icbhi = IcbhiAdapter::from_root(&config.icbhi_dir)?;
    let icbhi_table = run_extractor(&icbhi, &config.icbhi_dir, config, progress_enabled)?;

    info!("[step 2/4] processing folder-labeled Kaggle collection");
    let kaggle_table = run_extractor(&FolderAdapter, &config.kaggle_dir, config, progress_enabled)?;

    info!("[step 3/4] processing RespiratoryDatabase@TR");
    let resp_tr = match &config.resp_tr_labels {
        Some(table_path) => SeverityAdapter::from_severity_table(table_path)?,
        None => SeverityAdapter::from_root(&config.resp_tr_dir)?,
    };
    let resp_tr_table = run_extractor(&resp_tr, &config.resp_tr_dir, config, progress_enabled)?;

    info!("[step 4/4] merging metadata tables");
    merge_tables(config, &[icbhi_table, kaggle_table, resp_tr_table])
}

/// Run one extractor and persist its source table.
fn run_extractor(
    adapter: &dyn SourceAdapter,
    raw_root: &Path,
    config: &PipelineConfig,
    progress_enabled: bool,
) -> Result<SourceTable> {
    let table = extract::extract(adapter, raw_root, &config.audio_dir(), progress_enabled)?;
    let meta_path = config.output_dir.join(table.source.meta_filename());
    metadata::write_table(&meta_path, &table.records)?;
    info!(
        "{}: wrote {} row(s) to {}",
        table.source,
        table.len(),
        meta_path.display()
    );
    Ok(table)
}

/// Reload the persisted source tables, merge them, and write the combined
/// table.
///
/// Tables are read back from disk rather than reused in memory so the merge
/// step validates the same schema contract it would see when run against
/// tables produced by an earlier pipeline run.
fn merge_tables(config: &PipelineConfig, tables: &[SourceTable]) -> Result<()> {
    let mut loaded = Vec::with_capacity(tables.len());
    for table in tables {
        let meta_path = config.output_dir.join(table.source.meta_filename());
        loaded.push(SourceTable {
            source: table.source,
            records: metadata::read_table(&meta_path)?,
        });
    }

    let combined = merge::merge(&loaded);
    let combined_path = config
        .output_dir
        .join(constants::output_files::COMBINED_METADATA);
    metadata::write_table(&combined_path, &combined.records)?;

    info!("combined metadata saved to {}", combined_path.display());
    combined.summary().log();
    Ok(())
}

/// Initialize tracing subscriber with verbosity from CLI flags.
fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
