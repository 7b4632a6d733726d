//! Configuration for the fetcher module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the yt-dlp based fetcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Path to the yt-dlp binary.
    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: PathBuf,

    /// Location of ffmpeg handed to yt-dlp for audio extraction.
    /// When unset, yt-dlp searches `PATH`.
    #[serde(default)]
    pub ffmpeg_location: Option<PathBuf>,

    /// Target audio format (also the extension scanned for when building the manifest).
    #[serde(default = "default_audio_format")]
    pub audio_format: String,

    /// Output file name template, relative to the job directory.
    #[serde(default = "default_output_template")]
    pub output_template: String,

    /// Timeout for a whole fetch in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Additional yt-dlp arguments, inserted before the URL.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_ytdlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_audio_format() -> String {
    "mp3".to_string()
}

fn default_output_template() -> String {
    // Zero-padded playlist index keeps lexicographic order equal to fetch order
    "%(playlist_index)02d - %(title)s.%(ext)s".to_string()
}

fn default_timeout() -> u64 {
    3600 // 1 hour
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: default_ytdlp_path(),
            ffmpeg_location: None,
            audio_format: default_audio_format(),
            output_template: default_output_template(),
            timeout_secs: default_timeout(),
            extra_args: Vec::new(),
        }
    }
}

impl FetcherConfig {
    /// Creates a new config with a custom yt-dlp path.
    pub fn with_ytdlp_path(ytdlp_path: PathBuf) -> Self {
        Self {
            ytdlp_path,
            ..Default::default()
        }
    }

    /// Sets the ffmpeg location.
    pub fn with_ffmpeg_location(mut self, location: PathBuf) -> Self {
        self.ffmpeg_location = Some(location);
        self
    }

    /// Sets the target audio format.
    pub fn with_audio_format(mut self, format: impl Into<String>) -> Self {
        self.audio_format = format.into();
        self
    }

    /// Sets the timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}
