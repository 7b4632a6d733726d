//! Testing utilities and mock implementations.
//!
//! The mocks stand in for the external download tool and the tagging
//! library, so jobs and finalization can be exercised without network access
//! or real audio files.
//!
//! # Example
//!
//! ```rust,ignore
//! use playlist2album_core::testing::{MockFetcher, MockTagger};
//!
//! let fetcher = MockFetcher::new().with_file("01 - Intro.mp3");
//! let tagger = MockTagger::new();
//!
//! // Use in a JobManager / Finalizer...
//! ```

mod mock_fetcher;
mod mock_tagger;

pub use mock_fetcher::MockFetcher;
pub use mock_tagger::{MockTagger, RecordedTagWrite};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::Path;

    use crate::album::Track;

    /// Output lines of a playlist fetch with `count` items.
    pub fn playlist_lines(name: &str, count: u32) -> Vec<String> {
        let mut lines = vec![format!(
            "[youtube:tab] Playlist {}: Downloading {} items of {}",
            name, count, count
        )];
        for i in 1..=count {
            lines.push(format!("[download] Downloading item {} of {}", i, count));
            lines.push(format!("[download] Destination: {:02} - Track {}.webm", i, i));
            lines.push("[download] 100% of 3.00MiB in 00:00:01".to_string());
            lines.push(format!(
                "[ExtractAudio] Destination: {:02} - Track {}.mp3",
                i, i
            ));
        }
        lines
    }

    /// File names a playlist fetch with `count` items produces.
    pub fn playlist_files(count: u32) -> Vec<String> {
        (1..=count)
            .map(|i| format!("{:02} - Track {}.mp3", i, i))
            .collect()
    }

    /// A manifest entry for a file in `dir`.
    pub fn track(dir: &Path, id: u32, file_name: &str, title: &str) -> Track {
        Track {
            id,
            path: dir.join(file_name),
            title: title.to_string(),
        }
    }
}
