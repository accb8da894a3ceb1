//! The cumulative per-log dataset.
//!
//! The whole table is read, merged and rewritten on every run. That is fine
//! for a fleet of session files but is not meant for unbounded data.

use crate::error::{Error, Result};
use crate::models::{LogRow, LogRowKey, LOG_ROW_COLUMNS};
use crate::writer::{create_parent_dir, write_log_table};
use log::debug;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of merging a batch of rows into the dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Rows kept from the table before the merge
    pub existing_rows: usize,
    /// Rows offered by the batch
    pub incoming_rows: usize,
    /// Incoming rows that were already present
    pub duplicate_rows: usize,
    /// Rows in the table after the merge
    pub total_rows: usize,
}

impl MergeStats {
    /// Rows the merge actually added.
    pub fn added_rows(&self) -> usize {
        self.total_rows - self.existing_rows
    }
}

/// Ordered table of per-log rows with exact-row deduplication.
///
/// # Examples
///
/// ```no_run
/// use rowlog::dataset::Dataset;
///
/// let mut dataset = Dataset::load("training_logs.csv")?;
/// let batch = Dataset::load("new_logs.csv")?;
///
/// let stats = dataset.merge(batch.rows().to_vec());
/// dataset.save("training_logs.csv")?;
/// println!("added {} row(s)", stats.added_rows());
/// # Ok::<(), rowlog::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<LogRow>,
}

impl Dataset {
    /// An empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `rows` as they are. Duplicates are only dropped by
    /// [`Dataset::merge`].
    pub fn from_rows(rows: Vec<LogRow>) -> Self {
        Self { rows }
    }

    /// Load a per-log table. A missing file is an empty dataset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDataset`] when the header is not the per-log
    /// column list, and a CSV error for rows that do not parse.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No dataset at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        if fs::metadata(path)?.len() == 0 {
            return Ok(Self::new());
        }

        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?;
        if !headers.iter().eq(LOG_ROW_COLUMNS.iter().copied()) {
            return Err(Error::InvalidDataset(format!(
                "{} has columns [{}], expected [{}]",
                path.display(),
                headers.iter().collect::<Vec<_>>().join(","),
                LOG_ROW_COLUMNS.join(",")
            )));
        }

        let rows = reader
            .deserialize::<LogRow>()
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Loaded {} rows from {}", rows.len(), path.display());
        Ok(Self { rows })
    }

    /// Rows in table order.
    pub fn rows(&self) -> &[LogRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append `incoming` and drop exact duplicates. Existing rows keep their
    /// order and come first, followed by the surviving incoming rows in
    /// their own order. Duplicates already inside the existing table are
    /// collapsed too.
    pub fn merge(&mut self, incoming: Vec<LogRow>) -> MergeStats {
        let existing_rows = self.rows.len();
        let incoming_rows = incoming.len();

        let mut seen: HashSet<LogRowKey> = HashSet::with_capacity(existing_rows + incoming_rows);
        let mut merged = Vec::with_capacity(existing_rows + incoming_rows);
        let mut kept_existing = 0;

        for row in std::mem::take(&mut self.rows) {
            if seen.insert(row.key()) {
                merged.push(row);
                kept_existing += 1;
            }
        }

        for row in incoming {
            if seen.insert(row.key()) {
                merged.push(row);
            }
        }

        self.rows = merged;
        let total_rows = self.rows.len();

        MergeStats {
            existing_rows: kept_existing,
            incoming_rows,
            duplicate_rows: incoming_rows - (total_rows - kept_existing),
            total_rows,
        }
    }

    /// Overwrite the file at `path` with the full table.
    ///
    /// The table goes to a sibling `.partial` file first and is renamed into
    /// place, so readers never see a half-written dataset.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        create_parent_dir(path)?;

        let partial = partial_path(path);
        write_log_table(&partial, &self.rows)?;
        fs::rename(&partial, path)?;
        Ok(())
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".partial");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(filename: &str, delta: u32) -> LogRow {
        LogRow {
            filename: filename.to_string(),
            start_time: 1_700_000_000,
            delta,
            distance: delta as f32 / 100.0,
            strokerate: 22,
            heartrate: 150,
            longitude: None,
            latitude: None,
        }
    }

    #[test]
    fn test_merge_keeps_order_and_drops_duplicates() {
        let mut dataset = Dataset::from_rows(vec![row("a.pb", 1), row("a.pb", 2)]);
        let stats = dataset.merge(vec![row("a.pb", 2), row("b.pb", 1), row("b.pb", 1)]);

        assert_eq!(
            dataset.rows(),
            &[row("a.pb", 1), row("a.pb", 2), row("b.pb", 1)]
        );
        assert_eq!(stats.existing_rows, 2);
        assert_eq!(stats.incoming_rows, 3);
        assert_eq!(stats.duplicate_rows, 2);
        assert_eq!(stats.added_rows(), 1);
    }

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("out/training_logs.csv")),
            PathBuf::from("out/training_logs.csv.partial")
        );
    }
}
