//! Run configuration and default artifact names.

use std::path::{Path, PathBuf};

/// Extension of binary session files.
pub const DEFAULT_SOURCE_EXTENSION: &str = "pb";

pub const DEFAULT_DOCUMENT_FILE: &str = "training_data.json";
pub const DEFAULT_SUMMARY_FILE: &str = "training_data.csv";
pub const DEFAULT_LOGS_FILE: &str = "training_logs.csv";

pub const DEFAULT_LEDGER_FILE: &str = "processed_pb_files.txt";
pub const DEFAULT_TEMP_FILE: &str = "new_logs.csv";

/// Locations used by one merge run.
///
/// # Examples
///
/// ```
/// use rowlog::MergeConfig;
///
/// let config = MergeConfig::new("sessions")
///     .dataset_path("public/training_logs.csv")
///     .ledger_path("processed_pb_files.txt");
///
/// assert_eq!(config.extension, "pb");
/// assert_eq!(config.temp_path.to_str(), Some("public/new_logs.csv"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MergeConfig {
    pub source_dir: PathBuf,
    pub extension: String,
    pub dataset_path: PathBuf,
    pub ledger_path: PathBuf,
    /// Batch-scoped per-log table, removed after a successful merge
    pub temp_path: PathBuf,
    temp_path_set: bool,
}

impl MergeConfig {
    /// Create a configuration that reads session files from `source_dir`.
    ///
    /// The dataset, ledger and temporary artifact default to
    /// `training_logs.csv`, `processed_pb_files.txt` and `new_logs.csv` in
    /// the working directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowlog::MergeConfig;
    ///
    /// let config = MergeConfig::new("sessions");
    /// assert_eq!(config.dataset_path.to_str(), Some("training_logs.csv"));
    /// ```
    pub fn new<P: AsRef<Path>>(source_dir: P) -> Self {
        Self {
            source_dir: source_dir.as_ref().to_path_buf(),
            extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            dataset_path: PathBuf::from(DEFAULT_LOGS_FILE),
            ledger_path: PathBuf::from(DEFAULT_LEDGER_FILE),
            temp_path: PathBuf::from(DEFAULT_TEMP_FILE),
            temp_path_set: false,
        }
    }

    /// Set the extension of session files. A leading dot is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowlog::MergeConfig;
    ///
    /// let config = MergeConfig::new("sessions").extension(".bin");
    /// assert_eq!(config.extension, "bin");
    /// ```
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Set the cumulative dataset location. Unless a temporary path was set
    /// explicitly, the temporary artifact moves next to the dataset.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowlog::MergeConfig;
    ///
    /// let config = MergeConfig::new("sessions").dataset_path("out/logs.csv");
    /// assert_eq!(config.temp_path.to_str(), Some("out/new_logs.csv"));
    /// ```
    pub fn dataset_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.dataset_path = path.as_ref().to_path_buf();
        if !self.temp_path_set {
            self.temp_path = sibling(&self.dataset_path, DEFAULT_TEMP_FILE);
        }
        self
    }

    /// Set the ledger location.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rowlog::MergeConfig;
    ///
    /// let config = MergeConfig::new("sessions").ledger_path("state/processed.txt");
    /// ```
    pub fn ledger_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.ledger_path = path.as_ref().to_path_buf();
        self
    }

    /// Set the temporary artifact location. It must differ from both the
    /// dataset and the ledger, and is kept even if the dataset moves later.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowlog::MergeConfig;
    ///
    /// let config = MergeConfig::new("sessions")
    ///     .temp_path("/tmp/batch.csv")
    ///     .dataset_path("out/logs.csv");
    /// assert_eq!(config.temp_path.to_str(), Some("/tmp/batch.csv"));
    /// ```
    pub fn temp_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.temp_path = path.as_ref().to_path_buf();
        self.temp_path_set = true;
        self
    }
}

fn sibling(path: &Path, name: &str) -> PathBuf {
    match path.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}
