//! Writing extracted sessions to disk.
//!
//! Every artifact is a self-contained snapshot of one batch: files are
//! created or truncated, never appended to.

use crate::config::{DEFAULT_DOCUMENT_FILE, DEFAULT_LOGS_FILE, DEFAULT_SUMMARY_FILE};
use crate::error::{Error, Result};
use crate::extractor::Extraction;
use crate::models::{LogRow, SessionRecord, SummaryRow, LOG_ROW_COLUMNS};
use log::info;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writer for the three extraction artifacts: the full decoded document
/// (JSON), the per-session summary table and the per-log table (CSV).
///
/// # Examples
///
/// ```no_run
/// use rowlog::{ArtifactWriter, Extractor, ProtobufDecoder};
///
/// let extraction = Extractor::new(ProtobufDecoder::new()).extract(&["a.pb"]);
///
/// let stats = ArtifactWriter::new("./out").write(&extraction)?;
/// println!("{}", stats.summary());
/// # Ok::<(), rowlog::Error>(())
/// ```
pub struct ArtifactWriter {
    output_directory: PathBuf,
    document_name: String,
    summary_name: String,
    logs_name: String,
}

impl ArtifactWriter {
    /// Create a writer targeting `output_directory` with the default file names.
    pub fn new<P: AsRef<Path>>(output_directory: P) -> Self {
        Self {
            output_directory: output_directory.as_ref().to_path_buf(),
            document_name: DEFAULT_DOCUMENT_FILE.to_string(),
            summary_name: DEFAULT_SUMMARY_FILE.to_string(),
            logs_name: DEFAULT_LOGS_FILE.to_string(),
        }
    }

    pub fn document_name(mut self, name: impl Into<String>) -> Self {
        self.document_name = name.into();
        self
    }

    pub fn summary_name(mut self, name: impl Into<String>) -> Self {
        self.summary_name = name.into();
        self
    }

    pub fn logs_name(mut self, name: impl Into<String>) -> Self {
        self.logs_name = name.into();
        self
    }

    pub fn document_path(&self) -> PathBuf {
        self.output_directory.join(&self.document_name)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_directory.join(&self.summary_name)
    }

    pub fn logs_path(&self) -> PathBuf {
        self.output_directory.join(&self.logs_name)
    }

    /// Write all three artifacts and return what was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory cannot be created or any
    /// artifact cannot be written.
    pub fn write(&self, extraction: &Extraction) -> Result<WriteStats> {
        fs::create_dir_all(&self.output_directory).map_err(|e| {
            Error::Setup(format!(
                "cannot create output directory '{}': {}",
                self.output_directory.display(),
                e
            ))
        })?;

        write_document(self.document_path(), &extraction.sessions)?;
        info!("Data saved to {}", self.document_path().display());

        let summary_rows = extraction.summary_rows();
        write_summary_table(self.summary_path(), &summary_rows)?;
        info!("Summary data saved to {}", self.summary_path().display());

        let log_rows = extraction.log_rows();
        write_log_table(self.logs_path(), &log_rows)?;
        info!("Detailed logs saved to {}", self.logs_path().display());

        Ok(WriteStats {
            num_sessions: summary_rows.len(),
            num_log_rows: log_rows.len(),
            files: vec![self.document_path(), self.summary_path(), self.logs_path()],
        })
    }
}

/// Statistics about an artifact write.
#[derive(Debug, Clone)]
pub struct WriteStats {
    pub num_sessions: usize,
    pub num_log_rows: usize,
    /// Files created, in write order
    pub files: Vec<PathBuf>,
}

impl WriteStats {
    /// Get a human-readable summary of the write operation.
    pub fn summary(&self) -> String {
        format!(
            "Wrote {} session(s) and {} log row(s) to {} file(s)",
            self.num_sessions,
            self.num_log_rows,
            self.files.len()
        )
    }
}

/// Write the decoded sessions as a pretty-printed JSON array.
pub fn write_document<P: AsRef<Path>>(path: P, sessions: &[SessionRecord]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, sessions)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

pub fn write_summary_table<P: AsRef<Path>>(path: P, rows: &[SummaryRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write log rows with a header line, even when there are no rows.
pub fn write_log_table<P: AsRef<Path>>(path: P, rows: &[LogRow]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(LOG_ROW_COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Create the directory that will hold `path`, if it has one.
pub(crate) fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
