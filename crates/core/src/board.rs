//! Board projection: one bucket per job status, newest job first.
//!
//! [`build_board`] is a pure function of the [`JobStore`]; the result is
//! handed to a [`BoardSurface`] which replaces everything it displayed
//! before. Redrawing the whole board on every change keeps the view from
//! ever drifting away from the store.

use std::cmp::Ordering;

use crate::connection::ConnectionState;
use crate::detail::JobDetail;
use crate::job::{JobRecord, JobStatus};
use crate::log_feed::LogLine;
use crate::store::JobStore;
use crate::types::{JobId, Timestamp};

/// Number of leading `job_id` characters shown on a card.
pub const SHORT_ID_LEN: usize = 8;

/// Maximum message characters shown on a card before truncation.
pub const MESSAGE_PREVIEW_LEN: usize = 50;

const ELLIPSIS: &str = "...";

/// Display format for `submitted_at`.
const SUBMITTED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Summary of one job as drawn in a bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct JobCard {
    /// Full identifier, used when the card is activated.
    pub job_id: JobId,
    pub short_id: String,
    pub description: String,
    pub submitted_display: String,
}

/// All jobs sharing one status, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub status: JobStatus,
    pub cards: Vec<JobCard>,
}

impl Bucket {
    /// The count shown in the column header.
    pub fn count(&self) -> usize {
        self.cards.len()
    }
}

/// The four status buckets in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub buckets: Vec<Bucket>,
}

impl Board {
    pub fn bucket(&self, status: &JobStatus) -> Option<&Bucket> {
        self.buckets.iter().find(|b| &b.status == status)
    }

    /// Total number of cards across all buckets.
    pub fn card_count(&self) -> usize {
        self.buckets.iter().map(Bucket::count).sum()
    }

    /// Find the card for `job_id`, if it is on the board.
    pub fn card(&self, job_id: &str) -> Option<&JobCard> {
        self.buckets
            .iter()
            .flat_map(|b| b.cards.iter())
            .find(|c| c.job_id == job_id)
    }
}

/// Rendering target for the dashboard.
///
/// Implementations must treat `draw_board` as a full replace of the
/// previously drawn buckets and counts.
pub trait BoardSurface {
    fn draw_board(&mut self, board: &Board);
    fn set_connection(&mut self, state: ConnectionState);
    /// Append a log line and scroll the feed to it.
    fn append_log(&mut self, line: &LogLine);
    fn show_detail(&mut self, detail: &JobDetail);
    fn hide_detail(&mut self);
}

/// Partition the store into the four board buckets.
///
/// Jobs whose status is not a board status are left out entirely.
pub fn build_board(store: &JobStore) -> Board {
    let buckets = JobStatus::BOARD
        .iter()
        .map(|status| {
            let mut jobs: Vec<(Option<Timestamp>, &JobRecord)> = store
                .records()
                .filter(|r| &r.status == status)
                .map(|r| (r.submitted_at_parsed(), r))
                .collect();
            jobs.sort_by(|a, b| newest_first(a, b));

            Bucket {
                status: status.clone(),
                cards: jobs.into_iter().map(|(ts, r)| job_card(r, ts)).collect(),
            }
        })
        .collect();

    Board { buckets }
}

/// Parsed instants descending; unparseable timestamps after all parsed
/// ones, compared as raw strings; ties broken by `job_id`.
fn newest_first(a: &(Option<Timestamp>, &JobRecord), b: &(Option<Timestamp>, &JobRecord)) -> Ordering {
    let by_time = match (a.0, b.0) {
        (Some(ta), Some(tb)) => tb.cmp(&ta),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.1.submitted_at.cmp(&a.1.submitted_at),
    };
    by_time.then_with(|| a.1.job_id.cmp(&b.1.job_id))
}

fn job_card(record: &JobRecord, submitted: Option<Timestamp>) -> JobCard {
    JobCard {
        job_id: record.job_id.clone(),
        short_id: short_id(&record.job_id),
        description: describe(record),
        submitted_display: format_submitted(&record.submitted_at, submitted),
    }
}

/// First [`SHORT_ID_LEN`] characters followed by an ellipsis.
pub fn short_id(job_id: &str) -> String {
    let prefix: String = job_id.chars().take(SHORT_ID_LEN).collect();
    format!("{prefix}{ELLIPSIS}")
}

/// Card description line.
///
/// Completed jobs that report a processing time read
/// `Completed in {secs}s`; everything else shows a message preview.
pub fn describe(record: &JobRecord) -> String {
    match (&record.status, record.processing_time_seconds) {
        (JobStatus::Completed, Some(secs)) => format!("Completed in {secs}s"),
        _ => truncate(&record.message, MESSAGE_PREVIEW_LEN),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}{ELLIPSIS}")
    } else {
        head
    }
}

fn format_submitted(raw: &str, parsed: Option<Timestamp>) -> String {
    match parsed {
        Some(ts) => ts.format(SUBMITTED_FORMAT).to_string(),
        None if raw.trim().is_empty() => "-".to_string(),
        None => raw.to_string(),
    }
}
