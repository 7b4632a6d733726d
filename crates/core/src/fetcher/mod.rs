//! Fetcher module for downloading playlist audio with an external tool.
//!
//! The `Fetcher` trait hides the tool behind a line stream plus an exit
//! outcome. `YtDlpFetcher` runs yt-dlp with audio extraction, forwarding
//! stdout and stderr lines as they arrive.
//!
//! # Example
//!
//! ```ignore
//! use playlist2album_core::fetcher::{FetchRequest, Fetcher, YtDlpFetcher};
//!
//! let fetcher = YtDlpFetcher::with_defaults();
//! fetcher.validate().await?;
//!
//! let (line_tx, mut line_rx) = tokio::sync::mpsc::channel(256);
//! let request = FetchRequest {
//!     job_id: "job-1".to_string(),
//!     url: "https://www.youtube.com/playlist?list=...".to_string(),
//!     output_dir: PathBuf::from("/data/jobs/job-1"),
//! };
//! let fetch = fetcher.fetch(request, line_tx);
//! ```

mod config;
mod error;
mod traits;
mod ytdlp;

pub use config::FetcherConfig;
pub use error::FetcherError;
pub use traits::{FetchRequest, Fetcher};
pub use ytdlp::YtDlpFetcher;
