//! Tagger module for embedding album metadata into audio files.
//!
//! The `Tagger` trait abstracts the tagging library so finalization can be
//! tested without real audio. `Id3Tagger` writes ID3v2.3 frames.

mod error;
mod id3_tagger;
mod traits;
mod types;

pub use error::TaggerError;
pub use id3_tagger::Id3Tagger;
pub use traits::Tagger;
pub use types::{CoverArt, TrackTags};
