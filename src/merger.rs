//! Incremental merge of new session files into the cumulative dataset.
//!
//! A run moves through [`MergeStage`]s in order. The dataset is rewritten
//! before the ledger is appended to; if a run dies in between, the next run
//! re-extracts those files and deduplication absorbs the repeated rows.
//! A batch in which no file decodes leaves both untouched.
//!
//! Only one run may target a given dataset/ledger pair at a time. Nothing
//! here takes a lock.

use crate::config::MergeConfig;
use crate::dataset::{Dataset, MergeStats};
use crate::decoder::{base_name, SessionDecoder};
use crate::error::{Error, Result};
use crate::extractor::{find_sources, ExtractFailure, Extractor};
use crate::ledger::Ledger;
use crate::writer::{create_parent_dir, write_log_table};
use log::{debug, info, warn};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStage {
    Idle,
    DiffComputed,
    Extracting,
    Merging,
    LedgerUpdated,
    Cleanup,
    Done,
}

/// What a merge run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    /// Files that were new this run, sorted by name
    pub pending: Vec<String>,
    /// Files whose rows were merged and which were recorded in the ledger
    pub processed: Vec<String>,
    /// Files that failed to decode; they stay out of the ledger
    pub failed: Vec<ExtractFailure>,
    pub stats: MergeStats,
}

impl MergeOutcome {
    /// True when there was nothing new to do.
    pub fn is_noop(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Runs the ledger → extract → merge → ledger cycle.
///
/// # Examples
///
/// ```no_run
/// use rowlog::{MergeConfig, Merger, ProtobufDecoder};
///
/// let config = MergeConfig::new("sessions").dataset_path("training_logs.csv");
/// let outcome = Merger::new(config, ProtobufDecoder::new()).run()?;
///
/// println!("processed {:?}", outcome.processed);
/// # Ok::<(), rowlog::Error>(())
/// ```
pub struct Merger<D> {
    config: MergeConfig,
    extractor: Extractor<D>,
    stage: MergeStage,
}

impl<D: SessionDecoder> Merger<D> {
    pub fn new(config: MergeConfig, decoder: D) -> Self {
        Self {
            config,
            extractor: Extractor::new(decoder),
            stage: MergeStage::Idle,
        }
    }

    /// Stage reached by the last call to [`Merger::run`].
    pub fn stage(&self) -> MergeStage {
        self.stage
    }

    /// Source files not yet recorded in `ledger`, sorted by name.
    pub fn pending_files(&self, ledger: &Ledger) -> Result<Vec<PathBuf>> {
        let sources = find_sources(&self.config.source_dir, &self.config.extension)?;
        Ok(sources
            .into_iter()
            .filter(|path| !ledger.contains(&base_name(path)))
            .collect())
    }

    pub fn run(&mut self) -> Result<MergeOutcome> {
        self.stage = MergeStage::Idle;
        self.check_paths()?;
        self.remove_stale_temp()?;

        let mut ledger = Ledger::load(&self.config.ledger_path)?;
        let pending = self.pending_files(&ledger)?;
        self.advance(MergeStage::DiffComputed);

        if pending.is_empty() {
            println!("No new .{} files to process.", self.config.extension);
            self.advance(MergeStage::Done);
            return Ok(MergeOutcome::default());
        }

        let pending_names: Vec<String> = pending.iter().map(|p| base_name(p)).collect();
        println!(
            "New .{} files to process: {:?}",
            self.config.extension, pending_names
        );

        self.advance(MergeStage::Extracting);
        let extraction = self.extractor.extract(&pending);
        self.report_failures(&extraction.failures);

        if extraction.is_empty() {
            warn!(
                "None of the {} new file(s) decoded; {} and {} left unchanged",
                pending_names.len(),
                self.config.dataset_path.display(),
                self.config.ledger_path.display()
            );
            self.advance(MergeStage::Done);
            return Ok(MergeOutcome {
                pending: pending_names,
                processed: Vec::new(),
                failed: extraction.failures,
                stats: MergeStats::default(),
            });
        }

        create_parent_dir(&self.config.temp_path)?;
        write_log_table(&self.config.temp_path, &extraction.log_rows())?;

        self.advance(MergeStage::Merging);
        let mut dataset = Dataset::load(&self.config.dataset_path)?;
        let incoming = Dataset::load(&self.config.temp_path)?;
        let stats = dataset.merge(incoming.rows().to_vec());
        dataset.save(&self.config.dataset_path)?;
        info!(
            "Merged {} new row(s) into {} ({} duplicate(s) dropped, {} total)",
            stats.added_rows(),
            self.config.dataset_path.display(),
            stats.duplicate_rows,
            stats.total_rows
        );

        let processed = extraction.processed_filenames();
        ledger.append(&processed)?;
        self.advance(MergeStage::LedgerUpdated);

        self.advance(MergeStage::Cleanup);
        fs::remove_file(&self.config.temp_path)?;

        println!(
            "Done! Appended new logs to {} and updated {}.",
            self.config.dataset_path.display(),
            self.config.ledger_path.display()
        );
        self.advance(MergeStage::Done);

        Ok(MergeOutcome {
            pending: pending_names,
            processed,
            failed: extraction.failures,
            stats,
        })
    }

    fn advance(&mut self, stage: MergeStage) {
        debug!("merge stage {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }

    fn report_failures(&self, failures: &[ExtractFailure]) {
        for failure in failures {
            warn!(
                "{} was not merged and will be retried next run: {}",
                failure.filename, failure.reason
            );
        }
    }

    fn check_paths(&self) -> Result<()> {
        let config = &self.config;
        if config.temp_path == config.dataset_path || config.temp_path == config.ledger_path {
            return Err(Error::Setup(format!(
                "temporary artifact '{}' must not share a location with the dataset or ledger",
                config.temp_path.display()
            )));
        }
        if !config.source_dir.is_dir() {
            return Err(Error::Setup(format!(
                "'{}' is not a valid directory",
                config.source_dir.display()
            )));
        }
        Ok(())
    }

    /// A temporary artifact left by an interrupted run holds nothing that
    /// is not recomputed, so it is dropped.
    fn remove_stale_temp(&self) -> Result<()> {
        let temp = &self.config.temp_path;
        if temp.exists() {
            warn!("Removing stale temporary artifact {}", temp.display());
            fs::remove_file(temp)?;
        }
        Ok(())
    }
}
