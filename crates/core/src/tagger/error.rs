//! Error types for the tagger module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing tags.
#[derive(Debug, Error)]
pub enum TaggerError {
    /// The existing tag could not be read.
    #[error("Failed to read tags from {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    /// The tag could not be written back.
    #[error("Failed to write tags to {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// The file's container cannot carry this tagger's frames.
    #[error("Unsupported audio format for tagging: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// The blocking tagging task did not complete.
    #[error("Tagging task failed: {0}")]
    TaskFailed(String),
}

impl TaggerError {
    pub fn write_failed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::WriteFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
