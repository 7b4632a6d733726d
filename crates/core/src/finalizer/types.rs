//! Types for the finalizer module.

use serde::{Deserialize, Serialize};

use crate::album::{AlbumMeta, Track};

/// Caller's final ordering and metadata for a completed job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeRequest {
    pub job_id: String,
    #[serde(default)]
    pub album: AlbumMeta,
    /// Tracks in their final order; positions are taken from this order,
    /// not from the tracks' ids.
    pub ordered_tracks: Vec<Track>,
    /// Base64 image, optionally as a `data:` URL.
    #[serde(default)]
    pub cover_base64: Option<String>,
}

/// Outcome of a successful finalize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeResult {
    pub ok: bool,
    /// Public location of the archive.
    pub zip_url: String,
    /// Number of tracks in the archive.
    pub count: usize,
}
