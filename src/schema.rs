//! Protobuf schema of a recorded rowing session.
//!
//! Messages are declared with `prost` derives instead of generated code, so no
//! `protoc` step is needed at build time. Field numbers follow `training.proto`:
//!
//! ```text
//! message Training { Meta meta = 1; repeated Log logs = 2; }
//! message Meta {
//!   int64 start_time = 1; uint32 duration = 2; float distance = 3;
//!   TrainingType type = 4; TrainingMode mode = 5;
//!   uint32 split_distance = 6; uint32 rest_duration = 7;
//! }
//! message Log {
//!   uint32 delta = 1; float distance = 2; uint32 strokerate = 3;
//!   uint32 heartrate = 4; Position position = 5;
//! }
//! message Position { double longitude = 1; double latitude = 2; }
//! ```

/// One recorded session, the root message of every source file.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Training {
    #[prost(message, optional, tag = "1")]
    pub meta: Option<Meta>,
    #[prost(message, repeated, tag = "2")]
    pub logs: Vec<Log>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Meta {
    /// Seconds since the Unix epoch
    #[prost(int64, tag = "1")]
    pub start_time: i64,
    /// Seconds
    #[prost(uint32, tag = "2")]
    pub duration: u32,
    /// Meters
    #[prost(float, tag = "3")]
    pub distance: f32,
    #[prost(enumeration = "TrainingType", tag = "4")]
    pub r#type: i32,
    #[prost(enumeration = "TrainingMode", tag = "5")]
    pub mode: i32,
    #[prost(uint32, tag = "6")]
    pub split_distance: u32,
    #[prost(uint32, tag = "7")]
    pub rest_duration: u32,
}

/// A single sample taken during the session.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Log {
    /// Milliseconds since the previous sample
    #[prost(uint32, tag = "1")]
    pub delta: u32,
    #[prost(float, tag = "2")]
    pub distance: f32,
    #[prost(uint32, tag = "3")]
    pub strokerate: u32,
    #[prost(uint32, tag = "4")]
    pub heartrate: u32,
    #[prost(message, optional, tag = "5")]
    pub position: Option<Position>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Position {
    #[prost(double, tag = "1")]
    pub longitude: f64,
    #[prost(double, tag = "2")]
    pub latitude: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum TrainingType {
    Free = 0,
    Distance = 1,
    Time = 2,
    Interval = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum TrainingMode {
    Rowing = 0,
    Ergometer = 1,
    Paddling = 2,
}

impl TrainingType {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            TrainingType::Free => "FREE",
            TrainingType::Distance => "DISTANCE",
            TrainingType::Time => "TIME",
            TrainingType::Interval => "INTERVAL",
        }
    }
}

impl TrainingMode {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            TrainingMode::Rowing => "ROWING",
            TrainingMode::Ergometer => "ERGOMETER",
            TrainingMode::Paddling => "PADDLING",
        }
    }
}

/// Render an enum field the way the protobuf JSON mapping does: the symbolic
/// name when known, otherwise the raw number.
pub fn training_type_name(value: i32) -> String {
    match TrainingType::try_from(value) {
        Ok(t) => t.as_str_name().to_string(),
        Err(_) => value.to_string(),
    }
}

pub fn training_mode_name(value: i32) -> String {
    match TrainingMode::try_from(value) {
        Ok(m) => m.as_str_name().to_string(),
        Err(_) => value.to_string(),
    }
}
