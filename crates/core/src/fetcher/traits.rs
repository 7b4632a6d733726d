//! Trait definitions for the fetcher module.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::mpsc;

use super::error::FetcherError;

/// What to fetch and where to put it.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Job the fetch belongs to (for logging).
    pub job_id: String,
    /// Playlist or single video URL.
    pub url: String,
    /// Directory the produced audio files are written to.
    pub output_dir: PathBuf,
}

/// An external tool that downloads and transcodes audio into a directory.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the name of this fetcher implementation.
    fn name(&self) -> &str;

    /// Extension (without dot) of the audio files this fetcher produces.
    fn audio_extension(&self) -> &str;

    /// Runs the fetch to completion.
    ///
    /// Every line of tool output is sent on `line_tx` in the order it was
    /// read. The sender is dropped when this returns, which closes the
    /// channel. A closed receiver does not abort the fetch.
    async fn fetch(
        &self,
        request: FetchRequest,
        line_tx: mpsc::Sender<String>,
    ) -> Result<(), FetcherError>;

    /// Validates that the fetch tool is installed and runnable.
    async fn validate(&self) -> Result<(), FetcherError>;
}
