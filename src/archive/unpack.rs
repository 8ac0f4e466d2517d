//! Zip-to-directory unpacking with path-traversal hardening.

use std::fs::{self, File};
use std::path::Path;

use tracing::{debug, info, instrument};
use zip::ZipArchive;

use super::error::ArchiveError;

/// Expands the archive at `archive_path` into `dest_dir`, creating
/// intermediate directories as needed.
///
/// Every entry path is validated before any write: an entry that is
/// absolute or climbs out of `dest_dir` via `..` segments fails the whole
/// unpack with [`ArchiveError::UnsafePath`] and creates nothing outside
/// the destination.
///
/// # Errors
///
/// Returns [`ArchiveError::Zip`] when the container is unreadable,
/// [`ArchiveError::UnsafePath`] on a traversal attempt, and
/// [`ArchiveError::Io`] on filesystem failures.
#[instrument(skip_all, fields(archive = %archive_path.display(), dest = %dest_dir.display()))]
pub fn unpack(archive_path: &Path, dest_dir: &Path) -> Result<(), ArchiveError> {
    let file = File::open(archive_path).map_err(|e| ArchiveError::io(archive_path, e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| ArchiveError::zip(archive_path, e))?;

    fs::create_dir_all(dest_dir).map_err(|e| ArchiveError::io(dest_dir, e))?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| ArchiveError::zip(archive_path, e))?;

        // enclosed_name rejects absolute paths and `..` components.
        let Some(relative) = entry.enclosed_name() else {
            return Err(ArchiveError::unsafe_path(entry.name()));
        };
        let target = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| ArchiveError::io(&target, e))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| ArchiveError::io(parent, e))?;
        }
        let mut output = File::create(&target).map_err(|e| ArchiveError::io(&target, e))?;
        std::io::copy(&mut entry, &mut output).map_err(|e| ArchiveError::io(&target, e))?;
        debug!(entry = %target.display(), "extracted file");
    }

    info!(entries = archive.len(), dest = %dest_dir.display(), "archive expanded");
    Ok(())
}
