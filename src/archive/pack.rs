//! Directory-to-zip packing.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, instrument};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::error::ArchiveError;

/// Packs every regular file under `source_dir` into a deflate-compressed
/// zip archive at `archive_path`, returning the number of entries written.
///
/// Entry names are the `/`-joined paths relative to `source_dir`. The walk
/// order is sorted by file name, so repeated packs of the same tree produce
/// the same entry sequence.
///
/// # Errors
///
/// Returns [`ArchiveError::Io`] on filesystem failures and
/// [`ArchiveError::Zip`] when the container cannot be written.
#[instrument(skip_all, fields(source = %source_dir.display(), archive = %archive_path.display()))]
pub fn pack(source_dir: &Path, archive_path: &Path) -> Result<usize, ArchiveError> {
    let file = File::create(archive_path).map_err(|e| ArchiveError::io(archive_path, e))?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut count = 0usize;
    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source_dir).to_path_buf();
            ArchiveError::io(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(source_dir)
            .map_err(|e| ArchiveError::io(entry.path(), std::io::Error::other(e)))?;
        let name = entry_name(relative);

        writer
            .start_file(name.as_str(), options)
            .map_err(|e| ArchiveError::zip(archive_path, e))?;
        let mut input = File::open(entry.path()).map_err(|e| ArchiveError::io(entry.path(), e))?;
        std::io::copy(&mut input, &mut writer).map_err(|e| ArchiveError::io(entry.path(), e))?;

        count += 1;
        debug!(n = count, entry = %name, "packed file");
    }

    let mut inner = writer
        .finish()
        .map_err(|e| ArchiveError::zip(archive_path, e))?;
    inner
        .flush()
        .map_err(|e| ArchiveError::io(archive_path, e))?;

    info!(entries = count, archive = %archive_path.display(), "archive written");
    Ok(count)
}

/// Joins path components with `/`, the zip entry-name convention,
/// regardless of the host path separator.
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
