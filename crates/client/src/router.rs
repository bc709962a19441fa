//! Frame router: decodes text frames and dispatches them by kind.
//!
//! Unknown kinds are ignored and undecodable frames are dropped; a
//! single bad frame never stops the stream.

use jobwatch_core::job::JobRecord;

use crate::messages::{decode_frame, Decoded, InboundMessage};

/// Receiver of routed messages.
pub trait MessageHandler {
    /// A server log line for the log feed.
    fn on_log(&mut self, line: String);
    /// A full snapshot for the job store.
    fn on_snapshot(&mut self, records: Vec<JobRecord>);
    /// A single job update for the job store.
    fn on_update(&mut self, record: JobRecord);
}

/// What happened to one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Dispatched(&'static str),
    Ignored { kind: String },
    Dropped,
}

/// Decode `text` and hand the message to `handler`.
pub fn route_frame<H: MessageHandler>(text: &str, handler: &mut H) -> RouteOutcome {
    match decode_frame(text) {
        Ok(Decoded::Message(msg)) => {
            let kind = msg.kind();
            match msg {
                InboundMessage::Log(line) => handler.on_log(line),
                InboundMessage::AllJobs(records) => {
                    tracing::debug!(count = records.len(), "Applying job snapshot");
                    handler.on_snapshot(records);
                }
                InboundMessage::JobUpdate(record) => {
                    tracing::debug!(job_id = %record.job_id, status = %record.status, "Applying job update");
                    handler.on_update(record);
                }
            }
            RouteOutcome::Dispatched(kind)
        }
        Ok(Decoded::Unknown { kind }) => {
            tracing::debug!(kind = %kind, "Ignoring unknown message type");
            RouteOutcome::Ignored { kind }
        }
        Err(e) => {
            tracing::warn!(error = %e, raw_message = %text, "Dropping undecodable frame");
            RouteOutcome::Dropped
        }
    }
}
