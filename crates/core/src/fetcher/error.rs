//! Error types for the fetcher module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running the external fetch tool.
#[derive(Debug, Error)]
pub enum FetcherError {
    /// The fetch binary could not be found.
    #[error("Fetch tool not found at path: {path}")]
    BinaryNotFound { path: PathBuf },

    /// The process ran but reported failure.
    #[error("{reason}")]
    ProcessFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// The process did not finish in time and was killed.
    #[error("Fetch timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error while spawning or reading the process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetcherError {
    /// Creates a process failed error with captured stderr.
    pub fn process_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ProcessFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Message suitable for storing on a failed job, including the stderr tail.
    pub fn describe(&self) -> String {
        match self {
            Self::ProcessFailed {
                stderr: Some(stderr),
                ..
            } if !stderr.trim().is_empty() => format!("{}: {}", self, stderr.trim()),
            _ => self.to_string(),
        }
    }
}
