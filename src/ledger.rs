//! Durable record of the source files already merged into the dataset.
//!
//! The ledger is a UTF-8 text file with one file name per line. It is only
//! ever appended to.

use crate::error::Result;
use log::debug;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// In-memory view of a ledger file.
///
/// Lookups go through a set; [`Ledger::entries`] keeps the file order.
///
/// # Examples
///
/// ```no_run
/// use rowlog::ledger::Ledger;
///
/// let mut ledger = Ledger::load("processed_pb_files.txt")?;
/// if !ledger.contains("session_01.pb") {
///     ledger.append(&["session_01.pb"])?;
/// }
/// # Ok::<(), rowlog::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
    entries: Vec<String>,
    seen: HashSet<String>,
    /// The file's last line has no terminating newline
    unterminated: bool,
}

impl Ledger {
    /// Load the ledger at `path`. A missing file is an empty ledger.
    ///
    /// Lines are trimmed and blank lines are skipped.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut ledger = Self {
            path,
            entries: Vec::new(),
            seen: HashSet::new(),
            unterminated: false,
        };

        let text = match fs::read_to_string(&ledger.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No ledger at {}, starting empty", ledger.path.display());
                return Ok(ledger);
            }
            Err(e) => return Err(e.into()),
        };

        ledger.unterminated = !text.is_empty() && !text.ends_with('\n');
        for line in text.lines() {
            let name = line.trim();
            if !name.is_empty() {
                ledger.remember(name);
            }
        }

        debug!(
            "Loaded {} ledger entries from {}",
            ledger.entries.len(),
            ledger.path.display()
        );
        Ok(ledger)
    }

    /// File this ledger reads from and appends to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `filename` has already been merged.
    pub fn contains(&self, filename: &str) -> bool {
        self.seen.contains(filename)
    }

    /// Entries in the order they were first recorded.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append `filenames` to the ledger file, one per line, keeping every
    /// existing line. Names already present are skipped.
    pub fn append<S: AsRef<str>>(&mut self, filenames: &[S]) -> Result<()> {
        let mut batch = HashSet::new();
        let fresh: Vec<&str> = filenames
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| !self.contains(name) && batch.insert(*name))
            .collect();

        if fresh.is_empty() {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut buf = String::new();
        if self.unterminated {
            buf.push('\n');
        }
        for name in &fresh {
            buf.push_str(name);
            buf.push('\n');
        }
        file.write_all(buf.as_bytes())?;
        file.sync_all()?;
        self.unterminated = false;

        for name in fresh {
            self.remember(name);
        }
        Ok(())
    }

    fn remember(&mut self, name: &str) {
        if self.seen.insert(name.to_string()) {
            self.entries.push(name.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let ledger = Ledger::load("/nonexistent/dir/processed.txt").unwrap();
        assert!(ledger.is_empty());
        assert!(!ledger.contains("a.pb"));
    }
}
