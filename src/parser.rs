//! GitHub subtree URL validation and decomposition.
//!
//! A subtree URL has the shape
//! `https://github.com/<owner>/<repo>/tree/<branch>[/<path>...]`.
//! Parsing is a pure function: no network access, no side effects.

use thiserror::Error;
use url::Url;

/// Errors produced while parsing a subtree URL.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input is not a URL at all.
    #[error("malformed URL {url:?}: {source}")]
    Malformed {
        /// The raw input string.
        url: String,
        /// The underlying URL parse error.
        #[source]
        source: url::ParseError,
    },

    /// The URL parsed but its path does not name a repository subtree.
    #[error("invalid GitHub subtree URL {url:?}: {reason}")]
    InvalidShape {
        /// The raw input string.
        url: String,
        /// Human-readable description of what is wrong with the path.
        reason: &'static str,
    },
}

impl ParseError {
    fn invalid_shape(url: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidShape {
            url: url.into(),
            reason,
        }
    }
}

/// The decomposed identity of a remote repository subtree.
///
/// Immutable once parsed. `owner`, `repo` and `branch` are always
/// non-empty; `subtree_path` is empty when the URL points at the
/// repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocation {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Branch (or any ref accepted by the contents API).
    pub branch: String,
    /// Path of the subtree inside the repository, `/`-joined, possibly empty.
    pub subtree_path: String,
}

impl RepoLocation {
    /// Parses a GitHub subtree URL into its components.
    ///
    /// The URL path must have at least four segments and the third must be
    /// the literal `tree`; everything after the branch segment is rejoined
    /// with `/` into [`subtree_path`](Self::subtree_path).
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Malformed`] when the input is not a URL, and
    /// [`ParseError::InvalidShape`] when the path does not name a subtree.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let url = Url::parse(raw).map_err(|source| ParseError::Malformed {
            url: raw.to_string(),
            source,
        })?;

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        if segments.len() < 4 {
            return Err(ParseError::invalid_shape(
                raw,
                "expected path /<owner>/<repo>/tree/<branch>[/<path>...]",
            ));
        }
        if segments[2] != "tree" {
            return Err(ParseError::invalid_shape(
                raw,
                "third path segment must be the literal `tree`",
            ));
        }

        Ok(Self {
            owner: segments[0].to_string(),
            repo: segments[1].to_string(),
            branch: segments[3].to_string(),
            subtree_path: segments[4..].join("/"),
        })
    }
}
