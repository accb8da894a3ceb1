//! Test utilities for building session files
#![allow(dead_code)]

use prost::Message;
use rowlog::schema::{Log, Meta, Position, Training, TrainingMode, TrainingType};
use std::fs;
use std::path::{Path, PathBuf};

/// Builder for encoded `Training` messages
pub struct SessionBuilder {
    training: Training,
}

impl SessionBuilder {
    /// A distance session starting at `start_time` with no log entries
    pub fn new(start_time: i64) -> Self {
        Self {
            training: Training {
                meta: Some(Meta {
                    start_time,
                    duration: 480,
                    distance: 2000.0,
                    r#type: TrainingType::Distance as i32,
                    mode: TrainingMode::Rowing as i32,
                    split_distance: 500,
                    rest_duration: 0,
                }),
                logs: Vec::new(),
            },
        }
    }

    /// A message without any metadata
    pub fn without_meta() -> Self {
        Self {
            training: Training::default(),
        }
    }

    pub fn duration(mut self, seconds: u32) -> Self {
        self.meta().duration = seconds;
        self
    }

    pub fn distance(mut self, meters: f32) -> Self {
        self.meta().distance = meters;
        self
    }

    pub fn training_type(mut self, value: i32) -> Self {
        self.meta().r#type = value;
        self
    }

    pub fn mode(mut self, value: i32) -> Self {
        self.meta().mode = value;
        self
    }

    /// Add a log entry without a position
    pub fn log(mut self, delta: u32, distance: f32, strokerate: u32, heartrate: u32) -> Self {
        self.training.logs.push(Log {
            delta,
            distance,
            strokerate,
            heartrate,
            position: None,
        });
        self
    }

    /// Add a log entry with a position
    pub fn log_at(
        mut self,
        delta: u32,
        distance: f32,
        strokerate: u32,
        heartrate: u32,
        longitude: f64,
        latitude: f64,
    ) -> Self {
        self.training.logs.push(Log {
            delta,
            distance,
            strokerate,
            heartrate,
            position: Some(Position {
                longitude,
                latitude,
            }),
        });
        self
    }

    /// Add `count` evenly spaced entries
    pub fn logs(mut self, count: u32) -> Self {
        for i in 0..count {
            self = self.log(500, (i + 1) as f32 * 2.5, 24, 130 + i);
        }
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.training.encode_to_vec()
    }

    /// Encode and write into `dir/name`, returning the path
    pub fn write_to(self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, self.build()).unwrap();
        path
    }

    fn meta(&mut self) -> &mut Meta {
        self.training.meta.get_or_insert_with(Meta::default)
    }
}

/// Bytes that are not a valid protobuf message (truncated length-delimited field)
pub fn corrupt_bytes() -> Vec<u8> {
    vec![0x12, 0xff, 0x01, 0x08]
}

pub fn write_corrupt(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, corrupt_bytes()).unwrap();
    path
}

/// Read a CSV file into its lines
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| line.to_string())
        .collect()
}
