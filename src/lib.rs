//! # rowlog
//!
//! Converts rowing-machine session files (protobuf `Training` messages) into
//! CSV tables and keeps a cumulative per-log dataset up to date.
//!
//! ## Features
//!
//! - **Extraction**: decode a batch of session files into a JSON document, a
//!   per-session summary table and a per-log table
//! - **Fault isolation**: a file that fails to decode is reported and skipped
//! - **Incremental merge**: only files missing from the ledger are extracted,
//!   and merged rows are deduplicated
//!
//! ## Quick Start
//!
//! ```no_run
//! use rowlog::{ArtifactWriter, BatchSummary, Extractor, ProtobufDecoder};
//!
//! let extractor = Extractor::new(ProtobufDecoder::new());
//! let extraction = extractor.extract(&["2024-05-01.pb", "2024-05-03.pb"]);
//!
//! println!("{}", BatchSummary::from_sessions(&extraction.sessions));
//! ArtifactWriter::new("./out").write(&extraction)?;
//! # Ok::<(), rowlog::Error>(())
//! ```
//!
//! ## Incremental Merge
//!
//! ```no_run
//! use rowlog::{MergeConfig, Merger, ProtobufDecoder};
//!
//! let config = MergeConfig::new("sessions")
//!     .dataset_path("public/training_logs.csv")
//!     .ledger_path("processed_pb_files.txt");
//!
//! let outcome = Merger::new(config, ProtobufDecoder::new()).run()?;
//! if outcome.is_noop() {
//!     println!("nothing new");
//! }
//! # Ok::<(), rowlog::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! ```no_run
//! use rowlog::{Error, MergeConfig, Merger, ProtobufDecoder};
//!
//! match Merger::new(MergeConfig::new("sessions"), ProtobufDecoder::new()).run() {
//!     Ok(outcome) => println!("merged {} file(s)", outcome.processed.len()),
//!     Err(Error::Setup(msg)) => eprintln!("cannot start: {}", msg),
//!     Err(err) => eprintln!("Error: {}", err),
//! }
//! ```

// Public API modules
pub mod config;
pub mod error;
pub mod extractor;
pub mod merger;
pub mod writer;

// Re-export commonly used types
pub use config::MergeConfig;
pub use decoder::{ProtobufDecoder, SessionDecoder, SessionReader};
pub use error::{Error, Result};
pub use extractor::{ExtractFailure, Extraction, Extractor};
pub use merger::{MergeOutcome, MergeStage, Merger};
pub use summary::BatchSummary;
pub use writer::{ArtifactWriter, WriteStats};

// Re-export models for users who need them
pub use models::{LogRow, SessionRecord, SummaryRow};

// Building blocks (public but not part of the high-level API)
pub mod dataset;
pub mod decoder;
pub mod ledger;
pub mod models;
pub mod schema;
pub mod summary;
