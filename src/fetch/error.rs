//! Error types for the fetch module.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while listing or downloading remote tree nodes.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API request quota is exhausted (HTTP 403 with
    /// `X-RateLimit-Remaining: 0`). Recoverable by supplying a fresh token
    /// and restarting the walk from the top; never retried in place.
    #[error("GitHub rate limit exhausted; a fresh token is required")]
    RateLimited,

    /// Any other non-success HTTP response. The body is carried for
    /// diagnosis since transient and permanent failures cannot be told
    /// apart from the status alone.
    #[error("HTTP {status} fetching {url}: {body}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// The response body, as text.
        body: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS, timeout).
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The listing response body was not a valid JSON array of entries.
    #[error("failed to decode directory listing from {url}: {source}")]
    Decode {
        /// The listing URL whose body failed to decode.
        url: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A listing entry declared a type other than `file` or `dir`.
    #[error("unrecognized entry kind {kind:?} for {name:?}")]
    UnrecognizedKind {
        /// The entry name.
        name: String,
        /// The unrecognized type field value.
        kind: String,
    },

    /// A `file` entry arrived without a download URL.
    #[error("listing entry {name:?} is missing its download URL")]
    MissingDownloadUrl {
        /// The entry name.
        name: String,
    },

    /// Local filesystem failure while building the mirror.
    #[error("IO error at {path}: {source}")]
    Io {
        /// The local path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Creates a listing decode error.
    pub fn decode(url: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }

    /// Creates an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_display_carries_status_and_body() {
        let error = FetchError::http_status("https://api.github.com/x", 502, "bad gateway");
        let msg = error.to_string();
        assert!(msg.contains("502"), "expected status in: {msg}");
        assert!(msg.contains("bad gateway"), "expected body in: {msg}");
    }

    #[test]
    fn test_rate_limited_display_mentions_token() {
        let msg = FetchError::RateLimited.to_string();
        assert!(msg.contains("token"), "expected actionable hint in: {msg}");
    }

    #[test]
    fn test_io_display_carries_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = FetchError::io("/tmp/mirror/a.txt", io);
        assert!(error.to_string().contains("/tmp/mirror/a.txt"));
    }
}
