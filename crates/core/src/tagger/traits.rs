//! Trait definitions for the tagger module.

use async_trait::async_trait;
use std::path::Path;

use super::error::TaggerError;
use super::types::TrackTags;

/// Writes metadata tags into audio files in place.
#[async_trait]
pub trait Tagger: Send + Sync {
    /// Returns the name of this tagger implementation.
    fn name(&self) -> &str;

    /// Whether the file at `path` can be tagged without damaging it.
    fn supports(&self, path: &Path) -> bool;

    /// Writes `tags` into the file at `path`, keeping unrelated existing frames.
    async fn write_tags(&self, path: &Path, tags: &TrackTags) -> Result<(), TaggerError>;
}
