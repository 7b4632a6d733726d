//! Types for the progress module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::album::Track;

/// Lifecycle state of a download job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Record created, process not yet producing output.
    Starting,
    /// At least one progress signal has been observed.
    Downloading,
    /// Process exited successfully and the manifest was built.
    Completed,
    /// The job failed; see the record's error message.
    Error,
    /// Only reported for job ids the store has never seen.
    Unknown,
}

impl JobStatus {
    /// Whether no further transitions are allowed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Downloading => "downloading",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable per-job progress record held by the store.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressRecord {
    /// Items completed or in progress so far.
    pub current: u32,
    /// Expected item count. Starts at 1 until the real count is seen.
    pub total: u32,
    pub status: JobStatus,
    /// Title of the item currently being fetched.
    pub current_title: Option<String>,
    /// Set only when `status` is `Error`.
    pub error: Option<String>,
    /// Manifest, set only when `status` is `Completed`.
    pub tracks: Option<Vec<Track>>,
    /// Whether `total` came from tool output rather than the provisional default.
    #[serde(skip)]
    pub total_discovered: bool,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProgressRecord {
    /// A fresh record in the `Starting` state.
    pub fn starting() -> Self {
        let now = Utc::now();
        Self {
            current: 0,
            total: 1,
            status: JobStatus::Starting,
            current_title: None,
            error: None,
            tracks: None,
            total_discovered: false,
            started_at: now,
            updated_at: now,
        }
    }

    /// Moves `Starting` to `Downloading`; leaves other states alone.
    pub fn mark_downloading(&mut self) {
        if self.status == JobStatus::Starting {
            self.status = JobStatus::Downloading;
        }
    }

    /// Raises `current` without ever lowering it, keeping `current <= total`.
    pub fn advance_to(&mut self, current: u32) {
        self.current = self.current.max(current);
        self.clamp();
    }

    /// Restores `current <= total` by raising `total`.
    pub fn clamp(&mut self) {
        if self.current > self.total {
            self.total = self.current;
        }
    }
}

/// Read-only view of a job's progress, as served to pollers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub job_id: String,
    pub current: u32,
    pub total: u32,
    pub status: JobStatus,
    pub current_title: Option<String>,
}

impl ProgressSnapshot {
    /// Zeroed snapshot for a job id the store does not know.
    pub fn unknown(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            current: 0,
            total: 0,
            status: JobStatus::Unknown,
            current_title: None,
        }
    }

    pub fn from_record(job_id: impl Into<String>, record: &ProgressRecord) -> Self {
        Self {
            job_id: job_id.into(),
            current: record.current,
            total: record.total,
            status: record.status,
            current_title: record.current_title.clone(),
        }
    }
}
