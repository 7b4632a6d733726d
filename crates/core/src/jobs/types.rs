//! Types for the jobs module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::album::Track;
use crate::progress::JobStatus;

/// Returned by a launch, and again by the result lookup once the job completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchedJob {
    pub job_id: String,
    /// The job's working directory.
    pub out_dir: PathBuf,
    /// Empty at launch; the manifest once completed.
    pub tracks: Vec<Track>,
}

/// Where a job stands from a caller's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Still running.
    Pending(JobStatus),
    /// Finished; carries the manifest.
    Completed(Vec<Track>),
    /// Finished with an error message.
    Failed(String),
    /// The id was never launched.
    NotFound,
}
