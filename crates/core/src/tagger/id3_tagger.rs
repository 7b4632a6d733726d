//! ID3v2.3 tagger backed by the `id3` crate.

use async_trait::async_trait;
use id3::frame::{Picture, PictureType};
use id3::{ErrorKind, Tag, TagLike, Version};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::TaggerError;
use super::traits::Tagger;
use super::types::TrackTags;

/// Extension of the only container ID3v2 frames are written into.
const MP3_EXTENSION: &str = "mp3";

/// Tagger writing ID3v2.3 frames.
#[derive(Debug, Default, Clone)]
pub struct Id3Tagger;

impl Id3Tagger {
    pub fn new() -> Self {
        Self
    }
}

fn write_blocking(path: &Path, tags: &TrackTags) -> Result<(), TaggerError> {
    let mut tag = match Tag::read_from_path(path) {
        Ok(tag) => tag,
        Err(e) if matches!(e.kind, ErrorKind::NoTag) => Tag::new(),
        Err(e) => {
            return Err(TaggerError::ReadFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };

    tag.set_title(tags.title.as_str());
    tag.set_album(tags.album.as_str());
    if let Some(ref artist) = tags.artist {
        tag.set_artist(artist.as_str());
    }
    if let Some(ref year) = tags.year {
        match year.trim().parse::<i32>() {
            Ok(year) => tag.set_year(year),
            // Dates like "1999-05" go in verbatim
            Err(_) => tag.set_text("TDRC", year.as_str()),
        }
    }
    tag.set_track(tags.track_number);

    if let Some(ref cover) = tags.cover {
        tag.remove_picture_by_type(PictureType::CoverFront);
        tag.add_frame(Picture {
            mime_type: cover.mime_type.clone(),
            picture_type: PictureType::CoverFront,
            description: "Cover".to_string(),
            data: cover.data.clone(),
        });
    }

    tag.write_to_path(path, Version::Id3v23)
        .map_err(|e| TaggerError::write_failed(path, e))
}

#[async_trait]
impl Tagger for Id3Tagger {
    fn name(&self) -> &str {
        "id3"
    }

    fn supports(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(MP3_EXTENSION))
    }

    async fn write_tags(&self, path: &Path, tags: &TrackTags) -> Result<(), TaggerError> {
        if !self.supports(path) {
            return Err(TaggerError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
        debug!(path = %path.display(), track = tags.track_number, "Writing ID3 tags");
        let path: PathBuf = path.to_path_buf();
        let tags = tags.clone();
        tokio::task::spawn_blocking(move || write_blocking(&path, &tags))
            .await
            .map_err(|e| TaggerError::TaskFailed(e.to_string()))?
    }
}
