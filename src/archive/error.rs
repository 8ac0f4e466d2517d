//! Error types for archive packing and unpacking.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while packing or unpacking an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Local filesystem failure.
    #[error("IO error at {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The zip container itself failed to read or write.
    #[error("zip error in {path}: {source}")]
    Zip {
        /// The archive path.
        path: PathBuf,
        /// The underlying zip error.
        #[source]
        source: zip::result::ZipError,
    },

    /// An archive entry's path would escape the extraction directory
    /// (absolute path or `..` traversal).
    #[error("archive entry {entry:?} escapes the extraction directory")]
    UnsafePath {
        /// The offending entry name as stored in the archive.
        entry: String,
    },
}

impl ArchiveError {
    /// Creates an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a zip container error with archive-path context.
    pub fn zip(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Zip {
            path: path.into(),
            source,
        }
    }

    /// Creates an unsafe-path error for a rejected entry.
    pub fn unsafe_path(entry: impl Into<String>) -> Self {
        Self::UnsafePath {
            entry: entry.into(),
        }
    }
}
