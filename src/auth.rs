//! Token cache persistence.
//!
//! The cache is a single JSON object `{"token": "<string>"}` read at
//! startup and rewritten whenever the user supplies a new token.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default cache file name, created in the working directory.
pub const TOKEN_FILE_NAME: &str = "token.json";

/// Errors for token cache operations.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// Filesystem I/O failed.
    #[error("IO error at {path}: {source}")]
    Io {
        /// The cache file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The cache file exists but is not the expected JSON shape.
    #[error("token cache {path} is malformed: {source}")]
    Malformed {
        /// The cache file path.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
}

/// Reads and writes the persisted token cache file.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Creates a store over the given cache file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the cached token.
    ///
    /// Returns `Ok(None)` when the cache file does not exist or holds an
    /// empty token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] when the file exists but cannot be read
    /// or parsed.
    pub fn load(&self) -> Result<Option<String>, TokenStoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path).map_err(|source| TokenStoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let stored: StoredToken =
            serde_json::from_str(&raw).map_err(|source| TokenStoreError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), "token cache loaded");
        Ok(Some(stored.token).filter(|t| !t.is_empty()))
    }

    /// Persists a token, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError::Io`] when the file cannot be written.
    pub fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        let stored = StoredToken {
            token: token.to_string(),
        };
        #[allow(clippy::unwrap_used)]
        let body = serde_json::to_string(&stored).unwrap(); // struct of one String cannot fail
        fs::write(&self.path, body).map_err(|source| TokenStoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "token cache written");
        Ok(())
    }
}
