//! Recursive remote-tree traversal and local mirroring.
//!
//! The walk is strictly depth-first and sequential: each directory's
//! children are processed one at a time, in listing order, before control
//! returns to the parent. This keeps counter increments and log lines
//! deterministic at the cost of not overlapping network round-trips.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, instrument};

use super::client::GithubClient;
use super::error::FetchError;
use super::node::RemoteNode;

/// Mirrors a remote directory tree onto the local filesystem.
#[derive(Debug, Clone)]
pub struct Walker {
    client: GithubClient,
}

impl Walker {
    /// Creates a walker over the given client.
    #[must_use]
    pub fn new(client: GithubClient) -> Self {
        Self { client }
    }

    /// Recursively downloads the subtree listed at `listing_url` into
    /// `dest`, reproducing the remote directory structure.
    ///
    /// `counter` is shared by reference across every recursive frame so
    /// the running total covers the whole tree, not one subtree; it is
    /// bumped only after a file has been fully written, so any observer
    /// reading it sees a count of complete files.
    ///
    /// The first failing child aborts the walk for the whole subtree and
    /// propagates unchanged; no retry happens at this layer.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::RateLimited`], [`FetchError::HttpStatus`] or
    /// [`FetchError::Network`] from the API calls, and [`FetchError::Io`]
    /// on local directory-creation or write failures.
    #[instrument(skip(self, counter), fields(url = %listing_url, dest = %dest.display()))]
    pub async fn mirror(
        &self,
        listing_url: &str,
        dest: &Path,
        counter: &AtomicU64,
    ) -> Result<(), FetchError> {
        // Idempotent: re-running on an existing path is not an error.
        tokio::fs::create_dir_all(dest)
            .await
            .map_err(|e| FetchError::io(dest, e))?;

        let nodes = self.client.list_dir(listing_url).await?;

        for node in nodes {
            match node {
                RemoteNode::File { name, download_url } => {
                    let path = dest.join(&name);
                    let bytes = self.client.fetch_file(&download_url).await?;
                    tokio::fs::write(&path, &bytes)
                        .await
                        .map_err(|e| FetchError::io(&path, e))?;
                    let fetched = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    info!(n = fetched, path = %path.display(), "downloaded file");
                }
                RemoteNode::Dir { name, listing_url } => {
                    debug!(dir = %name, "entering directory");
                    let path = dest.join(&name);
                    Box::pin(self.mirror(&listing_url, &path, counter)).await?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn file_entry(server: &MockServer, name: &str, raw_path: &str) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "type": "file",
            "download_url": format!("{}{raw_path}", server.uri()),
            "url": format!("{}/unused/{name}", server.uri())
        })
    }

    fn dir_entry(server: &MockServer, name: &str, listing_path: &str) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "type": "dir",
            "download_url": null,
            "url": format!("{}{listing_path}", server.uri())
        })
    }

    async fn mount_listing(server: &MockServer, listing_path: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(listing_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    async fn mount_file(server: &MockServer, raw_path: &str, content: &str) {
        Mock::given(method("GET"))
            .and(path(raw_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(content))
            .mount(server)
            .await;
    }

    /// Remote tree `root/{a.txt, sub/{b.txt}}` mirrors to identical relative
    /// paths and the counter ends at 2.
    #[tokio::test]
    async fn test_mirror_nested_tree_preserves_structure_and_counts() {
        let server = MockServer::start().await;
        mount_listing(
            &server,
            "/list/root",
            serde_json::json!([
                file_entry(&server, "a.txt", "/raw/a.txt"),
                dir_entry(&server, "sub", "/list/sub"),
            ]),
        )
        .await;
        mount_listing(
            &server,
            "/list/sub",
            serde_json::json!([file_entry(&server, "b.txt", "/raw/b.txt")]),
        )
        .await;
        mount_file(&server, "/raw/a.txt", "alpha").await;
        mount_file(&server, "/raw/b.txt", "beta").await;

        let out = TempDir::new().unwrap();
        let dest = out.path().join("out");
        let counter = AtomicU64::new(0);
        let walker = Walker::new(GithubClient::with_api_base("t", server.uri()));

        walker
            .mirror(&format!("{}/list/root", server.uri()), &dest, &counter)
            .await
            .unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(std::fs::read_to_string(dest.join("a.txt")).unwrap(), "alpha");
        assert_eq!(
            std::fs::read_to_string(dest.join("sub/b.txt")).unwrap(),
            "beta"
        );
    }

    #[tokio::test]
    async fn test_mirror_three_levels_deep() {
        let server = MockServer::start().await;
        mount_listing(
            &server,
            "/list/root",
            serde_json::json!([dir_entry(&server, "l1", "/list/l1")]),
        )
        .await;
        mount_listing(
            &server,
            "/list/l1",
            serde_json::json!([dir_entry(&server, "l2", "/list/l2")]),
        )
        .await;
        mount_listing(
            &server,
            "/list/l2",
            serde_json::json!([file_entry(&server, "deep.txt", "/raw/deep.txt")]),
        )
        .await;
        mount_file(&server, "/raw/deep.txt", "bottom").await;

        let out = TempDir::new().unwrap();
        let counter = AtomicU64::new(0);
        let walker = Walker::new(GithubClient::with_api_base("t", server.uri()));

        walker
            .mirror(&format!("{}/list/root", server.uri()), out.path(), &counter)
            .await
            .unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(
            std::fs::read_to_string(out.path().join("l1/l2/deep.txt")).unwrap(),
            "bottom"
        );
    }

    #[tokio::test]
    async fn test_mirror_into_existing_directory_is_not_an_error() {
        let server = MockServer::start().await;
        mount_listing(&server, "/list/root", serde_json::json!([])).await;

        let out = TempDir::new().unwrap();
        let dest = out.path().join("out");
        std::fs::create_dir_all(&dest).unwrap();
        std::fs::write(dest.join("existing.txt"), "keep me").unwrap();

        let counter = AtomicU64::new(0);
        let walker = Walker::new(GithubClient::with_api_base("t", server.uri()));
        walker
            .mirror(&format!("{}/list/root", server.uri()), &dest, &counter)
            .await
            .unwrap();

        // Sibling contents are untouched
        assert_eq!(
            std::fs::read_to_string(dest.join("existing.txt")).unwrap(),
            "keep me"
        );
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    /// A rate-limit failure inside a nested listing aborts the whole walk:
    /// siblings listed after the failing directory are never fetched.
    #[tokio::test]
    async fn test_rate_limit_mid_walk_aborts_without_visiting_siblings() {
        let server = MockServer::start().await;
        mount_listing(
            &server,
            "/list/root",
            serde_json::json!([
                dir_entry(&server, "limited", "/list/limited"),
                file_entry(&server, "never.txt", "/raw/never.txt"),
            ]),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/list/limited"))
            .respond_with(ResponseTemplate::new(403).insert_header("X-RateLimit-Remaining", "0"))
            .mount(&server)
            .await;
        // The sibling file must never be requested after the abort.
        Mock::given(method("GET"))
            .and(path("/raw/never.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("unreachable"))
            .expect(0)
            .mount(&server)
            .await;

        let out = TempDir::new().unwrap();
        let counter = AtomicU64::new(0);
        let walker = Walker::new(GithubClient::with_api_base("t", server.uri()));

        let result = walker
            .mirror(&format!("{}/list/root", server.uri()), out.path(), &counter)
            .await;

        assert!(matches!(result, Err(FetchError::RateLimited)));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert!(!out.path().join("never.txt").exists());
    }

    #[tokio::test]
    async fn test_http_error_on_content_fetch_propagates_unchanged() {
        let server = MockServer::start().await;
        mount_listing(
            &server,
            "/list/root",
            serde_json::json!([file_entry(&server, "gone.txt", "/raw/gone.txt")]),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/raw/gone.txt"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let out = TempDir::new().unwrap();
        let counter = AtomicU64::new(0);
        let walker = Walker::new(GithubClient::with_api_base("t", server.uri()));

        let result = walker
            .mirror(&format!("{}/list/root", server.uri()), out.path(), &counter)
            .await;

        match result {
            Err(FetchError::HttpStatus { status, .. }) => assert_eq!(status, 404),
            other => panic!("expected HttpStatus, got: {other:?}"),
        }
        // Counter only reflects fully written files
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
