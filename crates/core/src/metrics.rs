//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Download jobs (started, finished, duration, parsed progress signals)
//! - Finalization (tagged tracks, archives)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Download Jobs
// =============================================================================

/// Jobs launched total.
pub static JOBS_STARTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("playlist2album_jobs_started_total", "Total download jobs launched").unwrap()
});

/// Jobs finished total by result.
pub static JOBS_FINISHED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "playlist2album_jobs_finished_total",
            "Total download jobs that reached a terminal state",
        ),
        &["result"], // "completed", "error"
    )
    .unwrap()
});

/// Job duration in seconds, from launch to terminal state.
pub static JOB_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("playlist2album_job_duration_seconds", "Duration of download jobs")
            .buckets(vec![5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0, 3600.0]),
        &["result"],
    )
    .unwrap()
});

/// Progress signals recognized in fetch tool output, by kind.
pub static PROGRESS_SIGNALS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "playlist2album_progress_signals_total",
            "Progress signals parsed from fetch tool output",
        ),
        &["kind"],
    )
    .unwrap()
});

/// Tracks discovered when building job manifests.
pub static TRACKS_DISCOVERED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "playlist2album_tracks_discovered_total",
        "Total audio files found in completed jobs",
    )
    .unwrap()
});

// =============================================================================
// Finalization
// =============================================================================

/// Finalize requests by result.
pub static FINALIZE_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("playlist2album_finalize_total", "Total finalize requests"),
        &["result"], // "success", "not_found", "invalid", "failed"
    )
    .unwrap()
});

/// Tracks tagged and renamed.
pub static TRACKS_TAGGED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("playlist2album_tracks_tagged_total", "Total tracks tagged").unwrap()
});

/// Time spent tagging and packaging one album.
pub static FINALIZE_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "playlist2album_finalize_duration_seconds",
            "Duration of album finalization",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Jobs
        Box::new(JOBS_STARTED.clone()),
        Box::new(JOBS_FINISHED.clone()),
        Box::new(JOB_DURATION.clone()),
        Box::new(PROGRESS_SIGNALS.clone()),
        Box::new(TRACKS_DISCOVERED.clone()),
        // Finalization
        Box::new(FINALIZE_TOTAL.clone()),
        Box::new(TRACKS_TAGGED.clone()),
        Box::new(FINALIZE_DURATION.clone()),
    ]
}
