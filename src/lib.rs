//! Gitgrab Core Library
//!
//! This library downloads an arbitrary subtree of a GitHub repository
//! through the contents API, mirrors it to local disk, packs the mirror
//! into a single zip archive, and re-expands that archive into a final
//! directory.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - GitHub subtree URL validation and decomposition
//! - [`fetch`] - Rate-limit aware contents client and recursive tree walker
//! - [`archive`] - Zip pack/unpack with path-traversal hardening
//! - [`auth`] - Token cache persistence
//! - [`pipeline`] - Orchestration of parse → walk → pack → unpack

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod archive;
pub mod auth;
pub mod fetch;
pub mod parser;
pub mod pipeline;

// Re-export commonly used types
pub use archive::{ArchiveError, pack, unpack};
pub use auth::{TOKEN_FILE_NAME, TokenStore, TokenStoreError};
pub use fetch::{DEFAULT_API_BASE, FetchError, GithubClient, RemoteNode, Walker};
pub use parser::{ParseError, RepoLocation};
pub use pipeline::{Pipeline, PipelineError, RunReport};
