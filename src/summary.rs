//! Aggregate statistics over a batch of sessions, for human inspection.

use crate::extractor::normalize_start_time;
use crate::models::SessionRecord;
use chrono::DateTime;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub sessions: usize,
    /// Meters
    pub total_distance: f64,
    /// Seconds
    pub total_duration: u64,
    pub total_logs: usize,
    pub types: BTreeMap<String, usize>,
    pub modes: BTreeMap<String, usize>,
    /// Earliest and latest nonzero start time, epoch seconds
    pub date_range: Option<(i64, i64)>,
}

impl BatchSummary {
    pub fn from_sessions(sessions: &[SessionRecord]) -> Self {
        let mut summary = BatchSummary {
            sessions: sessions.len(),
            ..Default::default()
        };

        for session in sessions {
            let meta = &session.meta;
            summary.total_distance += f64::from(meta.distance);
            summary.total_duration += u64::from(meta.duration);
            summary.total_logs += session.logs.len();

            *summary.types.entry(label(&meta.type_name)).or_insert(0) += 1;
            *summary.modes.entry(label(&meta.mode)).or_insert(0) += 1;

            let start = normalize_start_time(meta.start_time.as_ref());
            if start != 0 {
                summary.date_range = Some(match summary.date_range {
                    None => (start, start),
                    Some((lo, hi)) => (lo.min(start), hi.max(start)),
                });
            }
        }

        summary
    }
}

fn label(value: &str) -> String {
    if value.is_empty() {
        "UNKNOWN".to_string()
    } else {
        value.to_string()
    }
}

fn format_date(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.date_naive().to_string())
        .unwrap_or_else(|| "?".to_string())
}

fn format_counts(counts: &BTreeMap<String, usize>) -> String {
    let parts: Vec<String> = counts
        .iter()
        .map(|(name, count)| format!("{}: {}", name, count))
        .collect();
    format!("{{{}}}", parts.join(", "))
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== TRAINING DATA SUMMARY ===")?;
        writeln!(f, "Total training sessions: {}", self.sessions)?;

        if self.sessions == 0 {
            return Ok(());
        }

        writeln!(
            f,
            "Total distance: {:.0} meters ({:.2} km)",
            self.total_distance,
            self.total_distance / 1000.0
        )?;
        writeln!(
            f,
            "Total duration: {} seconds ({:.2} hours)",
            self.total_duration,
            self.total_duration as f64 / 3600.0
        )?;
        writeln!(f, "Total data points: {}", self.total_logs)?;
        writeln!(f, "Training types: {}", format_counts(&self.types))?;
        writeln!(f, "Training modes: {}", format_counts(&self.modes))?;

        if let Some((lo, hi)) = self.date_range {
            writeln!(f, "Date range: {} to {}", format_date(lo), format_date(hi))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LogEntry, SessionMeta, StartTime};

    fn session(start: &str, distance: f32, duration: u32, type_name: &str) -> SessionRecord {
        SessionRecord {
            meta: SessionMeta {
                start_time: Some(StartTime::Text(start.to_string())),
                duration,
                distance,
                type_name: type_name.to_string(),
                mode: "ROWING".to_string(),
                ..Default::default()
            },
            logs: vec![LogEntry::default(); 3],
            filename: format!("{}.pb", start),
        }
    }

    #[test]
    fn test_summary_totals_and_range() {
        let sessions = vec![
            session("1700000000", 2000.0, 480, "DISTANCE"),
            session("1700172800", 5000.0, 1200, "DISTANCE"),
            session("0", 1000.0, 300, "FREE"),
        ];
        let summary = BatchSummary::from_sessions(&sessions);

        assert_eq!(summary.sessions, 3);
        assert_eq!(summary.total_distance, 8000.0);
        assert_eq!(summary.total_duration, 1980);
        assert_eq!(summary.total_logs, 9);
        assert_eq!(summary.types.get("DISTANCE"), Some(&2));
        assert_eq!(summary.modes.get("ROWING"), Some(&3));
        assert_eq!(summary.date_range, Some((1_700_000_000, 1_700_172_800)));

        let text = summary.to_string();
        assert!(text.contains("Total distance: 8000 meters (8.00 km)"));
        assert!(text.contains("Training types: {DISTANCE: 2, FREE: 1}"));
        assert!(text.contains("Date range: 2023-11-14 to 2023-11-16"));
    }

    #[test]
    fn test_empty_summary() {
        let summary = BatchSummary::from_sessions(&[]);
        assert_eq!(summary.to_string(), "=== TRAINING DATA SUMMARY ===\nTotal training sessions: 0\n");
    }
}
