//! Batch extraction of session files into flat rows.
//!
//! The extractor decodes each file independently. A file that fails to decode
//! is logged and reported back in [`Extraction::failures`]; the rest of the
//! batch carries on.

use crate::decoder::{SessionDecoder, SessionReader};
use crate::error::{Error, Result};
use crate::models::{LogRow, SessionRecord, StartTime, SummaryRow};
use chrono::DateTime;
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// A file that was skipped because it could not be read or decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractFailure {
    pub filename: String,
    pub reason: String,
}

/// Result of extracting one batch of source files.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Successfully decoded sessions, in input order
    pub sessions: Vec<SessionRecord>,
    pub failures: Vec<ExtractFailure>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Names of the files that made it into this batch's output.
    pub fn processed_filenames(&self) -> Vec<String> {
        self.sessions.iter().map(|s| s.filename.clone()).collect()
    }

    pub fn summary_rows(&self) -> Vec<SummaryRow> {
        self.sessions.iter().map(summary_row).collect()
    }

    pub fn log_rows(&self) -> Vec<LogRow> {
        self.sessions.iter().flat_map(log_rows).collect()
    }
}

/// Drives a [`SessionDecoder`] over a list of files.
///
/// # Examples
///
/// ```no_run
/// use rowlog::{Extractor, ProtobufDecoder};
///
/// let extractor = Extractor::new(ProtobufDecoder::new());
/// let extraction = extractor.extract(&["a.pb", "b.pb"]);
///
/// for row in extraction.log_rows() {
///     println!("{} {} {}", row.filename, row.delta, row.distance);
/// }
/// ```
pub struct Extractor<D> {
    decoder: D,
}

impl<D: SessionDecoder> Extractor<D> {
    pub fn new(decoder: D) -> Self {
        Self { decoder }
    }

    /// Decode every file in `paths`, keeping input order.
    pub fn extract<P: AsRef<Path>>(&self, paths: &[P]) -> Extraction {
        let mut extraction = Extraction::default();
        let total = paths.len();

        for (idx, path) in paths.iter().enumerate() {
            let path = path.as_ref();
            info!("[{}/{}] Processing {}", idx + 1, total, path.display());

            match self.extract_one(path) {
                Ok(session) => {
                    info!("   └─ {} log entries", session.logs.len());
                    extraction.sessions.push(session);
                }
                Err(e) => {
                    let filename = crate::decoder::base_name(path);
                    error!("   └─ ✗ Error parsing {}: {}", path.display(), e);
                    extraction.failures.push(ExtractFailure {
                        filename,
                        reason: e.to_string(),
                    });
                }
            }
        }

        extraction
    }

    fn extract_one(&self, path: &Path) -> Result<SessionRecord> {
        let reader = SessionReader::from_file(path)?;
        reader.decode_with(&self.decoder)
    }
}

/// List the files directly inside `dir` whose extension is `extension`,
/// sorted by file name.
pub fn find_sources(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::Setup(format!(
            "'{}' is not a valid directory",
            dir.display()
        )));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some(extension))
        .collect();

    files.sort_by_key(|path| path.file_name().map(|name| name.to_os_string()));
    Ok(files)
}

/// Expand a mix of files and directories into a flat list of source files.
/// Directories contribute their matching files in name order; explicit files
/// are taken as given.
pub fn collect_sources(inputs: &[PathBuf], extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(find_sources(input, extension)?);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

/// Integer epoch seconds of a session's start time. Absent or unparseable
/// values become 0.
pub fn normalize_start_time(start_time: Option<&StartTime>) -> i64 {
    match start_time {
        None => 0,
        Some(StartTime::Number(n)) => *n,
        Some(StartTime::Text(text)) => match text.trim().parse::<i64>() {
            Ok(n) => n,
            Err(_) => {
                warn!("Unparseable start time {:?}, using 0", text);
                0
            }
        },
    }
}

/// ISO-8601 UTC datetime for an epoch timestamp, or an empty string for 0
/// and for values outside chrono's range.
pub fn derive_datetime(timestamp: i64) -> String {
    if timestamp == 0 {
        return String::new();
    }

    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string())
        .unwrap_or_default()
}

pub fn summary_row(session: &SessionRecord) -> SummaryRow {
    let start_time = normalize_start_time(session.meta.start_time.as_ref());

    SummaryRow {
        filename: session.filename.clone(),
        start_time,
        start_date_time: derive_datetime(start_time),
        duration: session.meta.duration,
        distance: session.meta.distance,
        type_name: session.meta.type_name.clone(),
        mode: session.meta.mode.clone(),
        split_distance: session.meta.split_distance,
        rest_duration: session.meta.rest_duration,
        num_logs: session.logs.len(),
    }
}

pub fn log_rows(session: &SessionRecord) -> Vec<LogRow> {
    let start_time = normalize_start_time(session.meta.start_time.as_ref());

    session
        .logs
        .iter()
        .map(|log| LogRow {
            filename: session.filename.clone(),
            start_time,
            delta: log.delta,
            distance: log.distance,
            strokerate: log.strokerate,
            heartrate: log.heartrate,
            longitude: log.position.as_ref().map(|p| p.longitude),
            latitude: log.position.as_ref().map(|p| p.latitude),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_start_time() {
        assert_eq!(normalize_start_time(None), 0);
        assert_eq!(normalize_start_time(Some(&StartTime::Number(42))), 42);
        assert_eq!(
            normalize_start_time(Some(&StartTime::Text("1700000000".to_string()))),
            1_700_000_000
        );
        assert_eq!(
            normalize_start_time(Some(&StartTime::Text("yesterday".to_string()))),
            0
        );
    }

    #[test]
    fn test_derive_datetime() {
        assert_eq!(derive_datetime(0), "");
        assert_eq!(derive_datetime(1_700_000_000), "2023-11-14T22:13:20");
        assert_eq!(derive_datetime(i64::MAX), "");
    }
}
