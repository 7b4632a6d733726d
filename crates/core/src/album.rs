//! Album and track types shared by the job and finalize flows.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::sanitize::sanitize;

/// `01 - `, `NA - ` (yt-dlp's placeholder outside playlists) or a bare `- `.
static ORDINAL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d+|NA)?\s*-\s*").expect("ordinal prefix regex"));

/// Format id yt-dlp appends to intermediate files (`Song.f251.webm`).
static FORMAT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.f\d+$").expect("format suffix regex"));

/// Album-level metadata supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumMeta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub year: String,
}

impl AlbumMeta {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            year: year.into(),
        }
    }

    /// Archive base name: `"<artist> - <title>"`, or just the title when no
    /// artist was given. Always sanitized.
    pub fn archive_stem(&self) -> String {
        if self.artist.trim().is_empty() {
            sanitize(&self.title)
        } else {
            sanitize(&format!(
                "{} - {}",
                sanitize(&self.artist),
                sanitize(&self.title)
            ))
        }
    }
}

/// One entry of a job's manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// 1-based sequence position.
    pub id: u32,
    /// Absolute path of the audio file.
    pub path: PathBuf,
    /// Display title.
    pub title: String,
}

/// Derives a display title from a file stem by stripping ordinal prefixes.
pub fn display_title(stem: &str) -> String {
    let stem = FORMAT_SUFFIX.replace(stem, "");
    let stripped = ORDINAL_PREFIX.replace(&stem, "");
    let stripped = stripped.trim();
    if stripped.is_empty() {
        stem.trim().to_string()
    } else {
        stripped.to_string()
    }
}

/// Display title for a path reported by the fetch tool.
pub fn title_from_path(path: &str) -> Option<String> {
    let stem = Path::new(path.trim()).file_stem()?.to_string_lossy();
    let title = display_title(&stem);
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}
