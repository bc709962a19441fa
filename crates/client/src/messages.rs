//! Dashboard WebSocket message types and parser.
//!
//! The server sends JSON frames shaped `{"type": "<kind>", "payload": ...}`
//! and accepts `{"action": "<name>"}` requests. Frames with an unknown
//! `type` decode to [`Decoded::Unknown`] so newer servers do not break
//! older dashboards.

use jobwatch_core::job::JobRecord;
use serde::{Deserialize, Serialize};

/// `type` value of a streamed log line.
pub const MSG_TYPE_LOG: &str = "log";

/// `type` value of a full job snapshot.
pub const MSG_TYPE_ALL_JOBS: &str = "all_jobs";

/// `type` value of a single-job update.
pub const MSG_TYPE_JOB_UPDATE: &str = "job_update";

/// All server → dashboard messages this client understands.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum InboundMessage {
    /// One formatted server log line.
    #[serde(rename = "log")]
    Log(String),

    /// Every job the server knows about; replaces client state.
    #[serde(rename = "all_jobs")]
    AllJobs(Vec<JobRecord>),

    /// Latest state of one job.
    #[serde(rename = "job_update")]
    JobUpdate(JobRecord),
}

impl InboundMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            InboundMessage::Log(_) => MSG_TYPE_LOG,
            InboundMessage::AllJobs(_) => MSG_TYPE_ALL_JOBS,
            InboundMessage::JobUpdate(_) => MSG_TYPE_JOB_UPDATE,
        }
    }
}

/// Result of decoding one text frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Message(InboundMessage),
    /// Well-formed envelope with a `type` this client does not handle.
    Unknown { kind: String },
}

/// Dashboard → server requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Ask for an `all_jobs` snapshot.
    GetAllJobs,
}

impl OutboundMessage {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Parse a dashboard WebSocket text frame.
///
/// Returns `Err` for non-JSON frames, frames without a string `type`,
/// and known kinds whose payload does not match. Callers drop those
/// and keep going.
pub fn decode_frame(text: &str) -> Result<Decoded, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(DecodeError::Json)?;

    let kind = value
        .get("type")
        .and_then(serde_json::Value::as_str)
        .ok_or(DecodeError::MissingType)?
        .to_string();

    if !matches!(kind.as_str(), MSG_TYPE_LOG | MSG_TYPE_ALL_JOBS | MSG_TYPE_JOB_UPDATE) {
        return Ok(Decoded::Unknown { kind });
    }

    serde_json::from_value(value)
        .map(Decoded::Message)
        .map_err(|source| DecodeError::Payload { kind, source })
}

/// Reasons a frame could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Frame is not valid JSON: {0}")]
    Json(serde_json::Error),

    #[error("Frame has no string `type` field")]
    MissingType,

    #[error("Malformed `{kind}` payload: {source}")]
    Payload {
        kind: String,
        source: serde_json::Error,
    },
}
