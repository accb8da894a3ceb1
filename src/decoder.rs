//! Decoding of binary session files into [`SessionRecord`] documents.

use crate::error::Result;
use crate::models::{LogEntry, Position, SessionMeta, SessionRecord, StartTime};
use crate::schema::{self, Training};
use memmap2::Mmap;
use prost::Message;
use std::fs::File;
use std::path::Path;

/// Turns the raw bytes of one source file into a session document.
///
/// The extractor only talks to this trait, so the binary format stays behind it.
pub trait SessionDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<SessionRecord>;
}

/// Decoder for the protobuf `Training` message.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufDecoder;

impl ProtobufDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl SessionDecoder for ProtobufDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<SessionRecord> {
        let training = Training::decode(bytes)?;
        Ok(to_document(training))
    }
}

/// Map the wire message onto the document model, following the protobuf JSON
/// mapping (int64 as string, enums by name, unset position left out).
fn to_document(training: Training) -> SessionRecord {
    let meta = training.meta.unwrap_or_default();

    SessionRecord {
        meta: SessionMeta {
            start_time: Some(StartTime::Text(meta.start_time.to_string())),
            duration: meta.duration,
            distance: meta.distance,
            type_name: schema::training_type_name(meta.r#type),
            mode: schema::training_mode_name(meta.mode),
            split_distance: meta.split_distance,
            rest_duration: meta.rest_duration,
        },
        logs: training
            .logs
            .into_iter()
            .map(|log| LogEntry {
                delta: log.delta,
                distance: log.distance,
                strokerate: log.strokerate,
                heartrate: log.heartrate,
                position: log.position.map(|p| Position {
                    longitude: p.longitude,
                    latitude: p.latitude,
                }),
            })
            .collect(),
        filename: String::new(),
    }
}

/// Reads one source file and decodes it.
///
/// # Examples
///
/// ```no_run
/// use rowlog::{ProtobufDecoder, SessionReader};
///
/// let reader = SessionReader::from_file("2024-05-01.pb")?;
/// let session = reader.decode_with(&ProtobufDecoder::new())?;
/// println!("{}: {} log entries", session.filename, session.logs.len());
/// # Ok::<(), rowlog::Error>(())
/// ```
pub struct SessionReader {
    filename: String,
    data: Source,
}

enum Source {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl SessionReader {
    /// Memory-map a source file. The session is named after the file's base name.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let filename = base_name(path);

        // Zero-length files cannot be mapped on every platform.
        let data = if file.metadata()?.len() == 0 {
            Source::Owned(Vec::new())
        } else {
            // SAFETY: source files are treated as immutable once written.
            Source::Mapped(unsafe { Mmap::map(&file)? })
        };

        Ok(Self { filename, data })
    }

    /// Wrap bytes that are already in memory.
    pub fn from_bytes(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            data: Source::Owned(data),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn bytes(&self) -> &[u8] {
        match &self.data {
            Source::Mapped(mmap) => &mmap[..],
            Source::Owned(data) => data.as_slice(),
        }
    }

    /// Decode the contents, tagging the record (or the error) with the file name.
    pub fn decode_with<D: SessionDecoder + ?Sized>(&self, decoder: &D) -> Result<SessionRecord> {
        let mut record = decoder
            .decode(self.bytes())
            .map_err(|e| e.with_file(&self.filename))?;
        record.filename = self.filename.clone();
        Ok(record)
    }
}

/// Base name of a path, lossily converted to UTF-8.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
