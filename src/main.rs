//! Command-line interface for rowlog.
//!
//! `extract` converts a batch of session files into standalone artifacts;
//! `merge` folds unseen files into the cumulative dataset.

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use rowlog::config::{DEFAULT_LEDGER_FILE, DEFAULT_LOGS_FILE, DEFAULT_SOURCE_EXTENSION};
use rowlog::extractor::collect_sources;
use rowlog::{ArtifactWriter, BatchSummary, Extractor, MergeConfig, Merger, ProtobufDecoder};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Convert rowing session files to CSV and merge them incrementally",
    long_about = "Decodes rowing-machine session files (protobuf) into CSV tables.\n\n\
                  `extract` writes a snapshot of one batch; `merge` adds only files not yet \
                  recorded in the ledger to a cumulative, deduplicated per-log dataset."
)]
struct Args {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode session files and write JSON, summary CSV and per-log CSV
    Extract {
        /// Session files, or directories to scan for them
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for the output artifacts
        #[arg(short, long, value_name = "OUT_DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Extension of session files when scanning directories
        #[arg(long, default_value = DEFAULT_SOURCE_EXTENSION)]
        extension: String,
    },

    /// Merge session files missing from the ledger into the cumulative dataset
    Merge {
        /// Directory containing session files
        #[arg(value_name = "SOURCE_DIR")]
        source_dir: PathBuf,

        /// Cumulative per-log dataset
        #[arg(short, long, default_value = DEFAULT_LOGS_FILE)]
        dataset: PathBuf,

        /// Ledger of already processed files
        #[arg(short, long, default_value = DEFAULT_LEDGER_FILE)]
        ledger: PathBuf,

        /// Temporary per-log table [default: next to the dataset]
        #[arg(long, value_name = "PATH")]
        temp: Option<PathBuf>,

        /// Extension of session files
        #[arg(long, default_value = DEFAULT_SOURCE_EXTENSION)]
        extension: String,
    },
}

fn extract(inputs: &[PathBuf], out_dir: PathBuf, extension: &str) -> Result<()> {
    println!("=== Training Data Extractor ===");

    let sources = collect_sources(inputs, extension)?;
    if sources.is_empty() {
        println!("No .{} files found", extension);
        return Ok(());
    }
    println!("Found {} training file(s)", sources.len());

    let t0 = Instant::now();
    let extraction = Extractor::new(ProtobufDecoder::new()).extract(&sources);
    info!("Decoded {} file(s) in {:.2?}", sources.len(), t0.elapsed());

    if extraction.is_empty() {
        println!("No training data found or all files failed to parse");
        return Ok(());
    }

    println!();
    print!("{}", BatchSummary::from_sessions(&extraction.sessions));

    let writer = ArtifactWriter::new(out_dir);
    let stats = writer.write(&extraction)?;
    info!("{}", stats.summary());

    println!();
    println!("=== EXTRACTION COMPLETE ===");
    println!("Files created:");
    for file in &stats.files {
        println!("- {}", file.display());
    }

    if !extraction.failures.is_empty() {
        println!("Skipped {} file(s) that failed to parse", extraction.failures.len());
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .format_timestamp(None)
        .parse_default_env()
        .init();

    match args.command {
        Command::Extract {
            inputs,
            out_dir,
            extension,
        } => extract(&inputs, out_dir, &extension),
        Command::Merge {
            source_dir,
            dataset,
            ledger,
            temp,
            extension,
        } => {
            let mut config = MergeConfig::new(source_dir)
                .extension(extension)
                .dataset_path(dataset)
                .ledger_path(ledger);
            if let Some(temp) = temp {
                config = config.temp_path(temp);
            }

            let t0 = Instant::now();
            let outcome = Merger::new(config, ProtobufDecoder::new()).run()?;
            if !outcome.is_noop() {
                info!(
                    "Processed {} of {} new file(s) in {:.2?}",
                    outcome.processed.len(),
                    outcome.pending.len(),
                    t0.elapsed()
                );
            }
            Ok(())
        }
    }
}
