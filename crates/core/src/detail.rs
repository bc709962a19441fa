//! Detail inspector: the full record of one job, pretty-printed.

use crate::store::JobStore;
use crate::types::JobId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDetail {
    pub job_id: JobId,
    /// Overlay title, `Job Details: {job_id}`.
    pub title: String,
    /// The record as indented JSON, passthrough fields included.
    pub body: String,
}

/// Project `job_id` from the store into a detail view.
///
/// Returns `None` for an id the store no longer knows; a stale card
/// reference is not an error.
pub fn inspect(store: &JobStore, job_id: &str) -> Option<JobDetail> {
    let record = store.get(job_id)?;
    let body = serde_json::to_string_pretty(record).unwrap_or_else(|_| format!("{record:#?}"));
    Some(JobDetail {
        job_id: record.job_id.clone(),
        title: format!("Job Details: {}", record.job_id),
        body,
    })
}

/// The currently open detail overlay, if any.
#[derive(Debug, Default)]
pub struct DetailOverlay {
    current: Option<JobDetail>,
}

impl DetailOverlay {
    pub fn open(&mut self, detail: JobDetail) {
        self.current = Some(detail);
    }

    /// Close the overlay; returns whether one was open.
    pub fn dismiss(&mut self) -> bool {
        self.current.take().is_some()
    }

    pub fn current(&self) -> Option<&JobDetail> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{JobRecord, JobStatus};

    #[test]
    fn unknown_job_is_none() {
        assert!(inspect(&JobStore::new(), "missing").is_none());
    }

    #[test]
    fn detail_contains_full_record() {
        let mut record = JobRecord::new("job-1", JobStatus::Failed).with_message("bad input");
        record
            .extra
            .insert("last_updated".into(), "2025-01-01T00:00:00+00:00".into());
        let mut store = JobStore::new();
        store.apply_update(record);

        let detail = inspect(&store, "job-1").unwrap();
        assert_eq!(detail.title, "Job Details: job-1");

        let body: serde_json::Value = serde_json::from_str(&detail.body).unwrap();
        assert_eq!(body["status"], "failed");
        assert_eq!(body["message"], "bad input");
        assert_eq!(body["last_updated"], "2025-01-01T00:00:00+00:00");
        assert!(detail.body.contains('\n'));
    }

    #[test]
    fn overlay_open_and_dismiss() {
        let mut overlay = DetailOverlay::default();
        assert!(!overlay.dismiss());

        overlay.open(JobDetail {
            job_id: "a".into(),
            title: "Job Details: a".into(),
            body: "{}".into(),
        });
        assert!(overlay.is_open());
        assert!(overlay.dismiss());
        assert!(overlay.current().is_none());
    }
}
