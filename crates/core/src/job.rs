//! Job record and status types as pushed by the scheduler.
//!
//! A [`JobRecord`] carries the handful of fields the board understands
//! plus every other field the server sent, flattened into `extra` so
//! the detail view can show the record verbatim.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{JobId, Timestamp};

/// Lifecycle status of a job.
///
/// The four named variants are the board columns. Any other string is
/// kept in [`JobStatus::Other`] so it survives a round trip, but such
/// jobs never appear on the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Other(String),
}

impl JobStatus {
    /// Board statuses in column order.
    pub const BOARD: [JobStatus; 4] = [
        JobStatus::Pending,
        JobStatus::Processing,
        JobStatus::Completed,
        JobStatus::Failed,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Other(raw) => raw,
        }
    }

    /// Whether jobs with this status get a column on the board.
    pub fn is_board_status(&self) -> bool {
        !matches!(self, JobStatus::Other(_))
    }

    /// Column heading, e.g. `Processing`.
    pub fn label(&self) -> &str {
        match self {
            JobStatus::Pending => "Pending",
            JobStatus::Processing => "Processing",
            JobStatus::Completed => "Completed",
            JobStatus::Failed => "Failed",
            JobStatus::Other(raw) => raw,
        }
    }
}

impl Default for JobStatus {
    /// A record without a status is treated as an unknown one.
    fn default() -> Self {
        JobStatus::Other(String::new())
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => JobStatus::Pending,
            "processing" => JobStatus::Processing,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Other(raw),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The latest known state of one job.
///
/// Updates replace the whole record; there is no field-level merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: JobId,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub message: String,
    /// Raw ISO-8601 submission time, used only for ordering and display.
    #[serde(default)]
    pub submitted_at: String,
    /// Present once the job has completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_seconds: Option<f64>,
    /// Fields the dashboard does not interpret (e.g. `last_updated`).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl JobRecord {
    pub fn new(job_id: impl Into<JobId>, status: JobStatus) -> Self {
        Self {
            job_id: job_id.into(),
            status,
            message: String::new(),
            submitted_at: String::new(),
            processing_time_seconds: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_submitted_at(mut self, submitted_at: impl Into<String>) -> Self {
        self.submitted_at = submitted_at.into();
        self
    }

    pub fn with_processing_time(mut self, seconds: f64) -> Self {
        self.processing_time_seconds = Some(seconds);
        self
    }

    /// Parse `submitted_at` as RFC 3339, falling back to a naive
    /// ISO-8601 timestamp interpreted as UTC.
    pub fn submitted_at_parsed(&self) -> Option<Timestamp> {
        parse_timestamp(&self.submitted_at)
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    #[test]
    fn status_parses_known_values() {
        assert_eq!(JobStatus::from("pending".to_string()), JobStatus::Pending);
        assert_eq!(JobStatus::from("failed".to_string()), JobStatus::Failed);
        assert_matches!(JobStatus::from("Completed".to_string()), JobStatus::Other(s) if s == "Completed");
    }

    #[test]
    fn unknown_status_round_trips_verbatim() {
        let json = r#"{"job_id":"x","status":"archived","message":"m","submitted_at":""}"#;
        let record: JobRecord = serde_json::from_str(json).unwrap();
        assert!(!record.status.is_board_status());

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["status"], "archived");
    }

    #[test]
    fn missing_optional_fields_default() {
        let record: JobRecord = serde_json::from_str(r#"{"job_id":"x"}"#).unwrap();
        assert_eq!(record.status, JobStatus::Other(String::new()));
        assert!(record.message.is_empty());
        assert!(record.processing_time_seconds.is_none());
    }

    #[test]
    fn extra_fields_pass_through() {
        let json = r#"{"job_id":"x","status":"completed","message":"done",
            "submitted_at":"2025-01-01T00:00:00+00:00","last_updated":"2025-01-01T00:00:04+00:00",
            "processing_time_seconds":4.0,"episode":{"name":"e1"}}"#;
        let record: JobRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.processing_time_seconds, Some(4.0));
        assert_eq!(record.extra["last_updated"], "2025-01-01T00:00:04+00:00");
        assert_eq!(record.extra["episode"]["name"], "e1");
        assert!(!record.extra.contains_key("job_id"));
    }

    #[test]
    fn job_id_is_required() {
        assert!(serde_json::from_str::<JobRecord>(r#"{"status":"pending"}"#).is_err());
    }

    #[test]
    fn parses_rfc3339_and_naive_timestamps() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        let with_offset = JobRecord::new("a", JobStatus::Pending)
            .with_submitted_at("2025-03-04T07:06:07+02:00");
        assert_eq!(with_offset.submitted_at_parsed(), Some(expected));

        let naive = JobRecord::new("a", JobStatus::Pending)
            .with_submitted_at("2025-03-04T05:06:07.250");
        assert_eq!(
            naive.submitted_at_parsed().map(|t| t.timestamp()),
            Some(expected.timestamp())
        );

        let garbage = JobRecord::new("a", JobStatus::Pending).with_submitted_at("T1");
        assert!(garbage.submitted_at_parsed().is_none());
    }
}
