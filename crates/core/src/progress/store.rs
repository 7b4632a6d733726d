//! Shared progress store.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use super::types::{JobStatus, ProgressRecord, ProgressSnapshot};
use crate::album::Track;

/// Process-scoped map from job id to progress record.
///
/// Cloning is cheap and every clone sees the same records. A single mutex
/// guards reads and writes; it is held for one update at a time and never
/// across an await point, so pollers always observe whole updates.
///
/// Records are never evicted. Removing finished jobs is left to the
/// embedding process.
#[derive(Debug, Clone, Default)]
pub struct ProgressStore {
    records: Arc<Mutex<HashMap<String, ProgressRecord>>>,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ProgressRecord>> {
        // A panicking writer cannot leave a record half-updated, so keep serving
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts a `Starting` record. Returns false if the id already exists.
    pub fn insert_starting(&self, job_id: &str) -> bool {
        let mut records = self.lock();
        if records.contains_key(job_id) {
            return false;
        }
        records.insert(job_id.to_string(), ProgressRecord::starting());
        true
    }

    /// Returns a copy of the full record.
    pub fn get(&self, job_id: &str) -> Option<ProgressRecord> {
        self.lock().get(job_id).cloned()
    }

    /// Returns the poller view, zeroed with `Unknown` status for missing ids.
    pub fn snapshot(&self, job_id: &str) -> ProgressSnapshot {
        match self.lock().get(job_id) {
            Some(record) => ProgressSnapshot::from_record(job_id, record),
            None => ProgressSnapshot::unknown(job_id),
        }
    }

    pub fn status(&self, job_id: &str) -> JobStatus {
        self.lock()
            .get(job_id)
            .map(|r| r.status)
            .unwrap_or(JobStatus::Unknown)
    }

    /// Applies `f` to a non-terminal record under the lock.
    ///
    /// Returns `None` without calling `f` when the job is missing or already
    /// in a terminal state.
    pub fn update<R>(&self, job_id: &str, f: impl FnOnce(&mut ProgressRecord) -> R) -> Option<R> {
        let mut records = self.lock();
        let record = records.get_mut(job_id)?;
        if record.status.is_terminal() {
            debug!(job_id, status = %record.status, "Ignoring update to finished job");
            return None;
        }
        let result = f(record);
        record.clamp();
        record.updated_at = Utc::now();
        Some(result)
    }

    /// Stores the manifest and marks the job completed.
    pub fn complete(&self, job_id: &str, tracks: Vec<Track>) -> bool {
        self.update(job_id, |record| {
            record.tracks = Some(tracks);
            record.status = JobStatus::Completed;
        })
        .is_some()
    }

    /// Records the error and marks the job failed, keeping observed progress.
    pub fn fail(&self, job_id: &str, message: impl Into<String>) -> bool {
        let message = message.into();
        self.update(job_id, |record| {
            record.error = Some(message);
            record.status = JobStatus::Error;
        })
        .is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of jobs per status, for metrics.
    pub fn count_by_status(&self) -> HashMap<JobStatus, usize> {
        let mut counts = HashMap::new();
        for record in self.lock().values() {
            *counts.entry(record.status).or_insert(0) += 1;
        }
        counts
    }
}
