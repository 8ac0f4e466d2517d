//! Rate-limit aware GitHub contents client and recursive tree walker.
//!
//! The client wraps authenticated GETs against the contents API and turns
//! quota exhaustion (HTTP 403 with `X-RateLimit-Remaining: 0`) into a
//! distinct error kind, because callers react to it differently from every
//! other failure: the orchestrator re-prompts for a fresh token and restarts
//! the walk, while any other error is fatal for the run.
//!
//! The walker traverses the remote tree strictly depth-first, one child at
//! a time, mirroring each directory level to local disk as it goes.

mod client;
mod error;
mod node;
mod walker;

pub use client::{DEFAULT_API_BASE, GithubClient};
pub use error::FetchError;
pub use node::RemoteNode;
pub use walker::Walker;
