//! Download jobs: launching, background workers and track manifests.
//!
//! `JobManager::launch` creates the job directory, registers a `starting`
//! progress record and spawns a `DownloadWorker`. The worker streams fetch
//! output through the progress parser and, once the fetch exits, records
//! either the track manifest or the failure.

mod error;
mod manager;
mod manifest;
mod types;
mod worker;

pub use error::JobError;
pub use manager::{resolve_job_dir, JobManager};
pub use manifest::build_manifest;
pub use types::{JobOutcome, LaunchedJob};
pub use worker::DownloadWorker;
