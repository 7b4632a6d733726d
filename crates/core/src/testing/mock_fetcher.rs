//! Mock fetcher for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, Notify, RwLock};

use crate::fetcher::{FetchRequest, Fetcher, FetcherError};

/// Mock implementation of the Fetcher trait.
///
/// Replays scripted output lines, writes scripted files into the job
/// directory and then exits successfully or with the configured error.
///
/// # Example
///
/// ```rust,ignore
/// use playlist2album_core::testing::MockFetcher;
///
/// let fetcher = MockFetcher::new()
///     .with_lines(["[youtube:tab] Playlist P: Downloading 2 items of 2"])
///     .with_file("01 - A.mp3")
///     .with_file("02 - B.mp3");
///
/// // After the job ran
/// assert_eq!(fetcher.fetch_count().await, 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockFetcher {
    /// Lines sent to the worker, in order.
    lines: Vec<String>,
    /// Files created in the output directory after the lines were sent.
    files: Vec<(String, Vec<u8>)>,
    /// If set, fetches wait for a notification before finishing.
    gate: Option<Arc<Notify>>,
    /// If set, the next fetch fails with this error after sending its lines.
    next_error: Arc<RwLock<Option<FetcherError>>>,
    /// Recorded requests.
    requests: Arc<RwLock<Vec<FetchRequest>>>,
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFetcher {
    /// Create a mock that succeeds without output.
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            files: Vec::new(),
            gate: None,
            next_error: Arc::new(RwLock::new(None)),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Append output lines.
    pub fn with_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Create a file with placeholder contents in the output directory.
    pub fn with_file(self, name: impl Into<String>) -> Self {
        self.with_file_contents(name, b"mock audio".to_vec())
    }

    /// Create a file with the given contents in the output directory.
    pub fn with_file_contents(mut self, name: impl Into<String>, contents: Vec<u8>) -> Self {
        self.files.push((name.into(), contents));
        self
    }

    /// Hold each fetch after its lines until `gate` is notified.
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Fail the first fetch with `error`.
    pub fn with_error(self, error: FetcherError) -> Self {
        Self {
            next_error: Arc::new(RwLock::new(Some(error))),
            ..self
        }
    }

    /// Configure the next fetch to fail with the given error.
    pub async fn set_next_error(&self, error: FetcherError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get all recorded fetch requests.
    pub async fn recorded_requests(&self) -> Vec<FetchRequest> {
        self.requests.read().await.clone()
    }

    /// Get the number of fetches started.
    pub async fn fetch_count(&self) -> usize {
        self.requests.read().await.len()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    fn audio_extension(&self) -> &str {
        "mp3"
    }

    async fn fetch(
        &self,
        request: FetchRequest,
        line_tx: mpsc::Sender<String>,
    ) -> Result<(), FetcherError> {
        self.requests.write().await.push(request.clone());

        for line in &self.lines {
            let _ = line_tx.send(line.clone()).await;
        }

        if let Some(ref gate) = self.gate {
            gate.notified().await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        for (name, contents) in &self.files {
            tokio::fs::write(request.output_dir.join(name), contents).await?;
        }

        Ok(())
    }

    async fn validate(&self) -> Result<(), FetcherError> {
        Ok(())
    }
}
