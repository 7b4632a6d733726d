//! Types for the tagger module.

/// Leading bytes of every PNG file.
const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Front cover image attached to every track of an album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverArt {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl CoverArt {
    /// Wraps raw image bytes, detecting PNG and assuming JPEG otherwise.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let mime_type = if data.starts_with(PNG_SIGNATURE) {
            "image/png"
        } else {
            "image/jpeg"
        };
        Self {
            mime_type: mime_type.to_string(),
            data,
        }
    }
}

/// Tags written to a single track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackTags {
    pub title: String,
    pub album: String,
    /// Omitted from the file when `None`.
    pub artist: Option<String>,
    /// Omitted from the file when `None`.
    pub year: Option<String>,
    /// 1-based position in the album.
    pub track_number: u32,
    pub cover: Option<CoverArt>,
}
