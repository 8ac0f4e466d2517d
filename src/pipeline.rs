//! Pipeline orchestration: parse → walk → pack → unpack.
//!
//! The mirror is staged in a temporary directory that is removed on both
//! success and failure; a partially written archive or extraction
//! directory is removed when a later stage fails, so no misleading
//! artifacts outlive an unsuccessful run.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tracing::{info, instrument};

use crate::archive::{self, ArchiveError};
use crate::fetch::{DEFAULT_API_BASE, FetchError, GithubClient, Walker};
use crate::parser::{ParseError, RepoLocation};

/// Top-level pipeline failure, one variant per stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source URL did not name a repository subtree.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Listing or downloading the remote tree failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Packing or unpacking the archive failed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// The staging directory for the mirror could not be created.
    #[error("failed to create staging directory: {0}")]
    Staging(#[source] std::io::Error),
}

impl PipelineError {
    /// True when the failure is quota exhaustion, which the caller can
    /// recover from by supplying a fresh token and rerunning.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Fetch(FetchError::RateLimited))
    }
}

/// Summary of one completed pipeline run.
#[derive(Debug)]
pub struct RunReport {
    /// Files downloaded by the tree walk.
    pub files_fetched: u64,
    /// Entries written into the archive.
    pub files_packed: usize,
    /// Path of the archive produced.
    pub archive_path: PathBuf,
    /// Directory holding the re-expanded tree.
    pub extract_dir: PathBuf,
}

/// Sequences the download-then-materialize pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    api_base: String,
    token: String,
}

impl Pipeline {
    /// Creates a pipeline against the production API base.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base(token, DEFAULT_API_BASE)
    }

    /// Creates a pipeline against a custom API base URL (used by tests).
    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            token: token.into(),
        }
    }

    /// Runs the full pipeline for one subtree URL.
    ///
    /// `counter` is the live file count shared with any progress observer;
    /// it is reset at the start of each run so a retried run starts from
    /// zero.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure; partial local artifacts are
    /// cleaned up before the error is returned.
    #[instrument(skip(self, counter), fields(url = %source_url))]
    pub async fn run(
        &self,
        source_url: &str,
        archive_path: &Path,
        extract_dir: &Path,
        counter: &AtomicU64,
    ) -> Result<RunReport, PipelineError> {
        counter.store(0, Ordering::SeqCst);

        let location = RepoLocation::parse(source_url)?;
        let client = GithubClient::with_api_base(&self.token, &self.api_base);
        let listing_url = client.contents_url(&location);
        info!(
            owner = %location.owner,
            repo = %location.repo,
            branch = %location.branch,
            subtree = %location.subtree_path,
            "starting download"
        );

        // Mirror staging lives in a TempDir: dropped (removed) on every
        // exit path, including errors.
        let staging = tempfile::tempdir().map_err(PipelineError::Staging)?;

        let walker = Walker::new(client);
        walker.mirror(&listing_url, staging.path(), counter).await?;
        let files_fetched = counter.load(Ordering::SeqCst);
        info!(files = files_fetched, "mirror complete");

        let files_packed = match archive::pack(staging.path(), archive_path) {
            Ok(count) => count,
            Err(error) => {
                let _ = std::fs::remove_file(archive_path);
                return Err(error.into());
            }
        };

        if let Err(error) = archive::unpack(archive_path, extract_dir) {
            let _ = std::fs::remove_file(archive_path);
            let _ = std::fs::remove_dir_all(extract_dir);
            return Err(error.into());
        }

        info!(
            files = files_fetched,
            packed = files_packed,
            archive = %archive_path.display(),
            extracted = %extract_dir.display(),
            "pipeline complete"
        );

        Ok(RunReport {
            files_fetched,
            files_packed,
            archive_path: archive_path.to_path_buf(),
            extract_dir: extract_dir.to_path_buf(),
        })
    }
}
