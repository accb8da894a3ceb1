//! Error types for the rowlog library.

use thiserror::Error;

/// Result type alias for rowlog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting sessions or merging the dataset.
#[derive(Debug, Error)]
pub enum Error {
    /// The run cannot start (missing source directory, unusable output location)
    #[error("Setup error: {0}")]
    Setup(String),

    /// A single source file could not be decoded
    #[error("Failed to decode {file}: {message}")]
    Decode { file: String, message: String },

    /// I/O error occurred while reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read or write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON document write error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The cumulative dataset on disk does not have the expected columns
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),
}

impl Error {
    /// Attach a file name to a decode error produced without one.
    pub fn with_file(self, file: &str) -> Self {
        match self {
            Error::Decode { message, .. } => Error::Decode {
                file: file.to_string(),
                message,
            },
            other => other,
        }
    }
}

impl From<prost::DecodeError> for Error {
    fn from(err: prost::DecodeError) -> Self {
        Error::Decode {
            file: "<bytes>".to_string(),
            message: err.to_string(),
        }
    }
}
