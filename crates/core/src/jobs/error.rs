//! Error types for the jobs module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while launching or looking up jobs.
#[derive(Debug, Error)]
pub enum JobError {
    /// The request cannot be turned into a job.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No job with this id exists.
    #[error("job_id not found: {job_id}")]
    NotFound { job_id: String },

    /// The job's working directory could not be created.
    #[error("Failed to create job directory {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl JobError {
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest(reason.into())
    }

    pub fn not_found(job_id: impl Into<String>) -> Self {
        Self::NotFound {
            job_id: job_id.into(),
        }
    }
}
