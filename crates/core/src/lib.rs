pub mod album;
pub mod config;
pub mod fetcher;
pub mod finalizer;
pub mod jobs;
pub mod metrics;
pub mod progress;
pub mod sanitize;
pub mod tagger;
pub mod testing;

pub use album::{display_title, AlbumMeta, Track};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, CorsConfig,
    ServerConfig, StorageConfig,
};
pub use fetcher::{FetchRequest, Fetcher, FetcherConfig, FetcherError, YtDlpFetcher};
pub use finalizer::{FinalizeError, FinalizeRequest, FinalizeResult, Finalizer};
pub use jobs::{JobError, JobManager, JobOutcome, LaunchedJob};
pub use progress::{JobStatus, ProgressSnapshot, ProgressStore};
pub use sanitize::sanitize;
pub use tagger::{CoverArt, Id3Tagger, Tagger, TaggerError, TrackTags};
