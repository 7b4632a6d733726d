//! Zip packaging of finalized tracks.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::error::FinalizeError;

/// Writes a deflate archive at `zip_path` holding `files` under their file names.
///
/// The archive is written to a temporary sibling first and moved into place,
/// so a download never sees a half-written file.
pub(crate) fn write_archive(zip_path: &Path, files: &[PathBuf]) -> Result<(), FinalizeError> {
    let archive_error = |reason: String| FinalizeError::Archive {
        path: zip_path.to_path_buf(),
        reason,
    };

    let partial = zip_path.with_extension("zip.partial");
    let file = File::create(&partial)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| archive_error(format!("no file name in {}", path.display())))?;
        writer
            .start_file(name, options)
            .map_err(|e| archive_error(e.to_string()))?;
        let mut source = File::open(path)?;
        io::copy(&mut source, &mut writer)?;
    }

    writer.finish().map_err(|e| archive_error(e.to_string()))?;
    std::fs::rename(&partial, zip_path)?;
    Ok(())
}
