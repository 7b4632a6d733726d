//! Error types for the finalizer module.

use std::path::PathBuf;
use thiserror::Error;

use crate::tagger::TaggerError;

/// Errors that can occur while finalizing an album.
#[derive(Debug, Error)]
pub enum FinalizeError {
    /// The job id is malformed or its directory does not exist.
    #[error("job_id not found")]
    NotFound { job_id: String },

    /// The cover payload is not valid base64.
    #[error("Invalid cover image: {reason}")]
    InvalidCover { reason: String },

    /// A track's source file does not exist.
    #[error("missing file: {path}")]
    MissingFile { path: PathBuf },

    /// The tagger cannot write into this track's container.
    #[error("unsupported audio format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// A track points outside the job directory.
    #[error("track is not part of this job: {path}")]
    ForeignTrack { path: PathBuf },

    /// The canonical name of a track is already taken by another file.
    #[error("cannot rename {from} to {to}: target already exists")]
    TargetExists { from: PathBuf, to: PathBuf },

    /// Writing tags failed.
    #[error("Failed to tag {path}: {source}")]
    Tagging {
        path: PathBuf,
        #[source]
        source: TaggerError,
    },

    /// Building the archive failed.
    #[error("Failed to build archive {path}: {reason}")]
    Archive { path: PathBuf, reason: String },

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FinalizeError {
    /// Whether the caller sent something unusable, as opposed to a server fault.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidCover { .. }
                | Self::MissingFile { .. }
                | Self::UnsupportedFormat { .. }
                | Self::ForeignTrack { .. }
                | Self::TargetExists { .. }
        )
    }

    /// Metric label for this error.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            e if e.is_validation() => "invalid",
            _ => "failed",
        }
    }
}
