//! Track manifest construction from a job's output directory.

use std::io;
use std::path::Path;

use crate::album::{display_title, Track};

/// Scans `dir` for files ending in `.<extension>` (case-insensitive) and
/// returns them as tracks, sorted by file name and numbered from 1.
///
/// Other files, such as intermediate downloads, are ignored.
pub async fn build_manifest(dir: &Path, extension: &str) -> io::Result<Vec<Track>> {
    let dir = tokio::fs::canonicalize(dir).await?;
    let mut entries = tokio::fs::read_dir(&dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let path = entry.path();
        let matches = path
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
            .unwrap_or(false);
        if matches {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files
        .into_iter()
        .enumerate()
        .map(|(idx, path)| {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            Track {
                id: idx as u32 + 1,
                title: display_title(&stem),
                path,
            }
        })
        .collect())
}
