//! Client-side mirror of every job the server has told us about.

use std::collections::HashMap;

use crate::job::JobRecord;

/// All known jobs keyed by `job_id`.
///
/// Mutated only by the dashboard's message handlers. Holds exactly one
/// record per id; the most recently applied record wins.
#[derive(Debug, Default, Clone)]
pub struct JobStore {
    jobs: HashMap<String, JobRecord>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire contents with a full snapshot.
    ///
    /// Jobs that are not in `records` are dropped. If a snapshot lists
    /// the same id twice, the later entry wins.
    pub fn apply_snapshot(&mut self, records: Vec<JobRecord>) {
        self.jobs = records
            .into_iter()
            .map(|record| (record.job_id.clone(), record))
            .collect();
    }

    /// Insert or overwrite a single record, returning the one it replaced.
    pub fn apply_update(&mut self, record: JobRecord) -> Option<JobRecord> {
        self.jobs.insert(record.job_id.clone(), record)
    }

    pub fn get(&self, job_id: &str) -> Option<&JobRecord> {
        self.jobs.get(job_id)
    }

    pub fn contains(&self, job_id: &str) -> bool {
        self.jobs.contains_key(job_id)
    }

    /// Iterate over all records in unspecified order.
    pub fn records(&self) -> impl Iterator<Item = &JobRecord> {
        self.jobs.values()
    }

    pub fn job_ids(&self) -> impl Iterator<Item = &str> {
        self.jobs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
