//! Album finalization: tag, rename and package a job's tracks.

use base64::Engine;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::archive::write_archive;
use super::error::FinalizeError;
use super::types::{FinalizeRequest, FinalizeResult};
use crate::album::AlbumMeta;
use crate::config::StorageConfig;
use crate::jobs::resolve_job_dir;
use crate::metrics;
use crate::sanitize::sanitize;
use crate::tagger::{CoverArt, Tagger, TrackTags};

/// Extension used when a source file has none.
const DEFAULT_EXTENSION: &str = "mp3";

/// Decodes a base64 cover, accepting `data:image/...;base64,` prefixes and
/// embedded whitespace. Empty payloads mean no cover.
pub fn decode_cover(payload: &str) -> Result<Option<CoverArt>, FinalizeError> {
    let payload = payload.trim();
    let payload = match payload.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => payload,
    };
    let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return Ok(None);
    }

    let data = base64::engine::general_purpose::STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|e| FinalizeError::InvalidCover {
            reason: e.to_string(),
        })?;
    Ok(Some(CoverArt::from_bytes(data)))
}

/// Applies final ordering and metadata to a job's tracks and packages them.
pub struct Finalizer {
    storage: StorageConfig,
    tagger: Arc<dyn Tagger>,
}

impl Finalizer {
    pub fn new(storage: StorageConfig, tagger: Arc<dyn Tagger>) -> Self {
        Self { storage, tagger }
    }

    /// Tags and renames every track in order, then writes the archive.
    ///
    /// Stops at the first failing track. Tracks processed before the failure
    /// keep their new tags and names.
    pub async fn finalize(&self, request: FinalizeRequest) -> Result<FinalizeResult, FinalizeError> {
        let started = Instant::now();
        let result = self.run(request).await;

        match &result {
            Ok(_) => {
                metrics::FINALIZE_TOTAL.with_label_values(&["success"]).inc();
                metrics::FINALIZE_DURATION.observe(started.elapsed().as_secs_f64());
            }
            Err(e) => {
                metrics::FINALIZE_TOTAL.with_label_values(&[e.label()]).inc();
            }
        }
        result
    }

    async fn run(&self, request: FinalizeRequest) -> Result<FinalizeResult, FinalizeError> {
        let FinalizeRequest {
            job_id,
            album,
            ordered_tracks,
            cover_base64,
        } = request;

        let job_dir = resolve_job_dir(&self.storage.jobs_dir(), &job_id)
            .ok_or_else(|| FinalizeError::NotFound {
                job_id: job_id.clone(),
            })?;
        if !tokio::fs::metadata(&job_dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            return Err(FinalizeError::NotFound { job_id });
        }
        let job_dir = tokio::fs::canonicalize(&job_dir).await?;

        let cover = match cover_base64.as_deref() {
            Some(payload) => decode_cover(payload)?,
            None => None,
        };

        info!(
            job_id = %job_id,
            tracks = ordered_tracks.len(),
            has_cover = cover.is_some(),
            "Finalizing album"
        );

        let mut final_paths = Vec::with_capacity(ordered_tracks.len());
        for (idx, track) in ordered_tracks.iter().enumerate() {
            let position = idx as u32 + 1;
            let source = self.locate_track(&job_dir, &track.path).await?;
            if !self.tagger.supports(&source) {
                return Err(FinalizeError::UnsupportedFormat { path: source });
            }
            let title = sanitize(&track.title);

            let tags = track_tags(&album, &title, position, cover.clone());
            self.tagger
                .write_tags(&source, &tags)
                .await
                .map_err(|source_err| FinalizeError::Tagging {
                    path: source.clone(),
                    source: source_err,
                })?;

            let extension = source
                .extension()
                .map(|e| e.to_string_lossy().to_string())
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
            let target = job_dir.join(format!("{:02} - {}.{}", position, title, extension));

            if source != target {
                if tokio::fs::try_exists(&target).await? {
                    return Err(FinalizeError::TargetExists {
                        from: source,
                        to: target,
                    });
                }
                tokio::fs::rename(&source, &target).await?;
                debug!(from = %source.display(), to = %target.display(), "Renamed track");
            }

            metrics::TRACKS_TAGGED.inc();
            final_paths.push(target);
        }

        let out_dir = self.storage.out_dir();
        tokio::fs::create_dir_all(&out_dir).await?;
        let zip_name = format!("{}.zip", album.archive_stem());
        let zip_path = out_dir.join(&zip_name);

        let archive_path = zip_path.clone();
        let count = final_paths.len();
        tokio::task::spawn_blocking(move || write_archive(&archive_path, &final_paths))
            .await
            .map_err(|e| FinalizeError::Archive {
                path: zip_path.clone(),
                reason: e.to_string(),
            })??;

        info!(job_id = %job_id, archive = %zip_path.display(), count, "Album archive written");

        Ok(FinalizeResult {
            ok: true,
            zip_url: format!("/download/{}", urlencoding::encode(&zip_name)),
            count,
        })
    }

    /// Resolves a caller-supplied track path to a file inside `job_dir`.
    async fn locate_track(&self, job_dir: &Path, path: &Path) -> Result<PathBuf, FinalizeError> {
        let source = match tokio::fs::canonicalize(path).await {
            Ok(source) if source.is_file() => source,
            _ => {
                warn!(path = %path.display(), "Track file missing");
                return Err(FinalizeError::MissingFile {
                    path: path.to_path_buf(),
                });
            }
        };
        if source.parent() != Some(job_dir) {
            return Err(FinalizeError::ForeignTrack {
                path: path.to_path_buf(),
            });
        }
        Ok(source)
    }
}

fn track_tags(album: &AlbumMeta, title: &str, position: u32, cover: Option<CoverArt>) -> TrackTags {
    let non_empty = |value: &str| {
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    };

    TrackTags {
        title: title.to_string(),
        album: sanitize(&album.title),
        artist: non_empty(&album.artist).map(|a| sanitize(&a)),
        year: non_empty(&album.year),
        track_number: position,
        cover,
    }
}
