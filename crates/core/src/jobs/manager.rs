//! Job launcher and registry of running workers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::JobError;
use super::types::{JobOutcome, LaunchedJob};
use super::worker::DownloadWorker;
use crate::album::AlbumMeta;
use crate::config::StorageConfig;
use crate::fetcher::{FetchRequest, Fetcher};
use crate::metrics;
use crate::progress::{JobStatus, ProgressSnapshot, ProgressStore};

/// Resolves the working directory of `job_id` under `jobs_dir`.
///
/// Only UUIDs are accepted, so the result always stays inside `jobs_dir`.
pub fn resolve_job_dir(jobs_dir: &Path, job_id: &str) -> Option<PathBuf> {
    let id = Uuid::parse_str(job_id).ok()?;
    Some(jobs_dir.join(id.hyphenated().to_string()))
}

/// Launches download jobs and keeps their worker handles.
pub struct JobManager {
    storage: StorageConfig,
    store: ProgressStore,
    fetcher: Arc<dyn Fetcher>,
    workers: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl JobManager {
    pub fn new(storage: StorageConfig, store: ProgressStore, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            storage,
            store,
            fetcher,
            workers: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    /// Starts a job for `url` and returns without waiting for it.
    ///
    /// The job directory is created before the worker is spawned, and the
    /// progress record exists as `starting` by the time this returns.
    pub async fn launch(&self, url: &str, album: &AlbumMeta) -> Result<LaunchedJob, JobError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(JobError::invalid_request("playlist_url must not be empty"));
        }
        if url.starts_with('-') {
            return Err(JobError::invalid_request(
                "playlist_url must not start with '-'",
            ));
        }

        let jobs_dir = self.storage.jobs_dir();
        tokio::fs::create_dir_all(&jobs_dir)
            .await
            .map_err(|source| JobError::DirectoryCreationFailed {
                path: jobs_dir.clone(),
                source,
            })?;

        let job_id = Uuid::new_v4().to_string();
        let job_dir = jobs_dir.join(&job_id);
        tokio::fs::create_dir(&job_dir)
            .await
            .map_err(|source| JobError::DirectoryCreationFailed {
                path: job_dir.clone(),
                source,
            })?;

        if !self.store.insert_starting(&job_id) {
            // v4 collisions do not happen in practice, but never clobber a record
            return Err(JobError::invalid_request(format!(
                "job id {} already exists",
                job_id
            )));
        }

        info!(
            job_id = %job_id,
            url = %url,
            album = %album.title,
            "Launching download job"
        );
        metrics::JOBS_STARTED.inc();

        let worker = DownloadWorker::new(self.store.clone(), Arc::clone(&self.fetcher));
        let request = FetchRequest {
            job_id: job_id.clone(),
            url: url.to_string(),
            output_dir: job_dir.clone(),
        };
        let handle = tokio::spawn(worker.run(request));

        let mut workers = self.workers.lock().await;
        workers.retain(|_, handle| !handle.is_finished());
        workers.insert(job_id.clone(), handle);

        Ok(LaunchedJob {
            job_id,
            out_dir: job_dir,
            tracks: Vec::new(),
        })
    }

    /// Current progress, zeroed with `unknown` status for unknown ids.
    pub fn progress(&self, job_id: &str) -> ProgressSnapshot {
        self.store.snapshot(job_id)
    }

    /// Where the job stands.
    pub fn outcome(&self, job_id: &str) -> JobOutcome {
        let Some(record) = self.store.get(job_id) else {
            return JobOutcome::NotFound;
        };
        match record.status {
            JobStatus::Completed => JobOutcome::Completed(record.tracks.unwrap_or_default()),
            JobStatus::Error => JobOutcome::Failed(
                record
                    .error
                    .unwrap_or_else(|| "download failed".to_string()),
            ),
            status => JobOutcome::Pending(status),
        }
    }

    /// The completed job's manifest, or an error describing why there is none.
    pub fn result(&self, job_id: &str) -> Result<LaunchedJob, JobOutcome> {
        match self.outcome(job_id) {
            JobOutcome::Completed(tracks) => Ok(LaunchedJob {
                job_id: job_id.to_string(),
                out_dir: self.job_dir(job_id).unwrap_or_default(),
                tracks,
            }),
            other => Err(other),
        }
    }

    /// Working directory of a job, if `job_id` is a well-formed id.
    pub fn job_dir(&self, job_id: &str) -> Option<PathBuf> {
        resolve_job_dir(&self.storage.jobs_dir(), job_id)
    }

    /// Waits for a job's worker to finish. Returns false if there was no
    /// running worker for it.
    pub async fn wait(&self, job_id: &str) -> bool {
        let handle = self.workers.lock().await.remove(job_id);
        match handle {
            Some(handle) => {
                if let Err(e) = handle.await {
                    warn!(job_id, error = %e, "Download worker panicked");
                }
                true
            }
            None => false,
        }
    }

    /// Number of workers that have not finished yet.
    pub async fn active_count(&self) -> usize {
        self.workers
            .lock()
            .await
            .values()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Waits for every outstanding worker.
    pub async fn shutdown(&self) {
        let handles: Vec<(String, JoinHandle<()>)> = self.workers.lock().await.drain().collect();
        if handles.is_empty() {
            return;
        }

        info!(count = handles.len(), "Waiting for download workers to finish");
        for (job_id, handle) in handles {
            if let Err(e) = handle.await {
                warn!(job_id = %job_id, error = %e, "Download worker panicked");
            }
        }
        debug!("All download workers finished");
    }
}
