use serde::{Deserialize, Serialize};

/// Session start time as it appears in the decoded document.
///
/// 64-bit integers travel as strings in the protobuf JSON mapping, so both
/// shapes are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StartTime {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub delta: u32,
    pub distance: f32,
    pub strokerate: u32,
    pub heartrate: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<StartTime>,
    pub duration: u32,
    pub distance: f32,
    #[serde(rename = "type")]
    pub type_name: String,
    pub mode: String,
    pub split_distance: u32,
    pub rest_duration: u32,
}

/// Decoded form of one source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub meta: SessionMeta,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    pub filename: String,
}

/// One row of the per-session summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub filename: String,
    pub start_time: i64,
    pub start_date_time: String,
    pub duration: u32,
    pub distance: f32,
    #[serde(rename = "type")]
    pub type_name: String,
    pub mode: String,
    pub split_distance: u32,
    pub rest_duration: u32,
    pub num_logs: usize,
}

/// One row of the per-log table and of the cumulative dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRow {
    pub filename: String,
    pub start_time: i64,
    pub delta: u32,
    pub distance: f32,
    pub strokerate: u32,
    pub heartrate: u32,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

/// Column names of [`LogRow`] in file order.
pub const LOG_ROW_COLUMNS: [&str; 8] = [
    "filename",
    "startTime",
    "delta",
    "distance",
    "strokerate",
    "heartrate",
    "longitude",
    "latitude",
];

/// Exact-equality key of a [`LogRow`]. Floats compare by bit pattern and a
/// missing coordinate never equals a present one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogRowKey {
    filename: String,
    start_time: i64,
    delta: u32,
    distance: u32,
    strokerate: u32,
    heartrate: u32,
    longitude: Option<u64>,
    latitude: Option<u64>,
}

impl LogRow {
    pub fn key(&self) -> LogRowKey {
        LogRowKey {
            filename: self.filename.clone(),
            start_time: self.start_time,
            delta: self.delta,
            distance: self.distance.to_bits(),
            strokerate: self.strokerate,
            heartrate: self.heartrate,
            longitude: self.longitude.map(f64::to_bits),
            latitude: self.latitude.map(f64::to_bits),
        }
    }
}
