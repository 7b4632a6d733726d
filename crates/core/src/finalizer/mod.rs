//! Finalizer module for turning a completed job into a tagged album archive.
//!
//! For each track, in the caller's order, the `Finalizer` writes tags through
//! the configured `Tagger` and renames the file to `NN - Title.ext`. The
//! renamed files are then packed into `<out_dir>/<name>.zip`.

mod archive;
mod error;
#[allow(clippy::module_inception)]
mod finalizer;
mod types;

pub use error::FinalizeError;
pub use finalizer::{decode_cover, Finalizer};
pub use types::{FinalizeRequest, FinalizeResult};
