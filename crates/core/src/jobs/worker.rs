//! Background worker driving one download job.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::manifest::build_manifest;
use crate::fetcher::{FetchRequest, Fetcher};
use crate::metrics;
use crate::progress::{parse_line, ProgressStore};

/// Capacity of the line channel between fetcher and worker.
const LINE_BUFFER: usize = 256;

/// Runs a fetch, folds its output into the progress store and records the
/// terminal state.
///
/// Nothing escapes the worker: every failure ends up as the job's stored
/// error.
pub struct DownloadWorker {
    store: ProgressStore,
    fetcher: Arc<dyn Fetcher>,
}

impl DownloadWorker {
    pub fn new(store: ProgressStore, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { store, fetcher }
    }

    pub async fn run(self, request: FetchRequest) {
        let job_id = request.job_id.clone();
        let job_dir = request.output_dir.clone();
        let started = Instant::now();

        info!(job_id = %job_id, fetcher = %self.fetcher.name(), "Download worker started");

        let (line_tx, mut line_rx) = mpsc::channel::<String>(LINE_BUFFER);

        let consume = async {
            let mut line_count = 0usize;
            while let Some(line) = line_rx.recv().await {
                line_count += 1;
                self.apply_line(&job_id, &line);
            }
            line_count
        };

        let (result, line_count) = tokio::join!(self.fetcher.fetch(request, line_tx), consume);
        debug!(job_id = %job_id, line_count, "Fetch output consumed");

        let finished = match result {
            Err(e) => {
                let message = e.describe();
                warn!(job_id = %job_id, error = %message, "Fetch failed");
                self.store.fail(&job_id, message)
            }
            Ok(()) => {
                // A single item may finish without any recognized output
                self.store.update(&job_id, |record| {
                    if record.total == 1 && record.current == 0 {
                        record.current = 1;
                    }
                });

                match build_manifest(&job_dir, self.fetcher.audio_extension()).await {
                    Ok(tracks) => {
                        info!(job_id = %job_id, tracks = tracks.len(), "Download job completed");
                        metrics::TRACKS_DISCOVERED.inc_by(tracks.len() as u64);
                        self.store.complete(&job_id, tracks)
                    }
                    Err(e) => {
                        warn!(job_id = %job_id, error = %e, "Failed to build track manifest");
                        self.store
                            .fail(&job_id, format!("Failed to build track manifest: {}", e))
                    }
                }
            }
        };

        if finished {
            let result = self.store.status(&job_id).as_str();
            metrics::JOBS_FINISHED.with_label_values(&[result]).inc();
            metrics::JOB_DURATION
                .with_label_values(&[result])
                .observe(started.elapsed().as_secs_f64());
        }
    }

    fn apply_line(&self, job_id: &str, line: &str) {
        for signal in parse_line(line) {
            metrics::PROGRESS_SIGNALS
                .with_label_values(&[signal.kind().as_str()])
                .inc();
            self.store.update(job_id, |record| signal.apply(record));
        }
    }
}
