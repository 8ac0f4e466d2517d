//! Remote tree node decoding.
//!
//! One [`RemoteNode`] is decoded per contents-API listing entry, consumed
//! immediately during traversal and then discarded; the remote tree is
//! never retained in memory as a whole.

use serde::Deserialize;

use super::error::FetchError;

/// A raw directory-entry object as returned by the contents API.
///
/// Only the fields the walker needs are decoded; everything else in the
/// response object is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct RawEntry {
    pub(crate) name: String,
    #[serde(rename = "type")]
    pub(crate) kind: String,
    pub(crate) download_url: Option<String>,
    pub(crate) url: String,
}

/// One child of a remote directory, classified as file or directory.
///
/// By construction each variant carries exactly the URL relevant to its
/// kind: a file carries the raw-content URL, a directory carries the URL
/// of its own listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteNode {
    /// A regular file and the URL returning its raw bytes.
    File {
        /// Entry name within its parent directory.
        name: String,
        /// Raw content URL.
        download_url: String,
    },
    /// A directory and the URL listing its children.
    Dir {
        /// Entry name within its parent directory.
        name: String,
        /// Nested listing URL.
        listing_url: String,
    },
}

impl RemoteNode {
    /// Classifies a raw listing entry.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::UnrecognizedKind`] for any `type` other than
    /// `"file"` or `"dir"`, and [`FetchError::MissingDownloadUrl`] when a
    /// file entry carries no download URL.
    pub(crate) fn from_entry(entry: RawEntry) -> Result<Self, FetchError> {
        match entry.kind.as_str() {
            "file" => {
                let download_url =
                    entry
                        .download_url
                        .ok_or_else(|| FetchError::MissingDownloadUrl {
                            name: entry.name.clone(),
                        })?;
                Ok(Self::File {
                    name: entry.name,
                    download_url,
                })
            }
            "dir" => Ok(Self::Dir {
                name: entry.name,
                listing_url: entry.url,
            }),
            _ => Err(FetchError::UnrecognizedKind {
                name: entry.name,
                kind: entry.kind,
            }),
        }
    }

    /// Entry name within its parent directory.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Dir { name, .. } => name,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn raw(name: &str, kind: &str, download_url: Option<&str>) -> RawEntry {
        RawEntry {
            name: name.to_string(),
            kind: kind.to_string(),
            download_url: download_url.map(str::to_string),
            url: format!("https://api.github.com/repos/o/r/contents/{name}"),
        }
    }

    #[test]
    fn test_file_entry_maps_to_file_node() {
        let node = RemoteNode::from_entry(raw("a.txt", "file", Some("https://raw/a.txt"))).unwrap();
        assert_eq!(
            node,
            RemoteNode::File {
                name: "a.txt".to_string(),
                download_url: "https://raw/a.txt".to_string(),
            }
        );
    }

    #[test]
    fn test_dir_entry_maps_to_dir_node_with_listing_url() {
        let node = RemoteNode::from_entry(raw("sub", "dir", None)).unwrap();
        match node {
            RemoteNode::Dir { name, listing_url } => {
                assert_eq!(name, "sub");
                assert!(listing_url.ends_with("/contents/sub"));
            }
            other => panic!("expected Dir node, got: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result = RemoteNode::from_entry(raw("link", "symlink", None));
        assert!(matches!(
            result,
            Err(FetchError::UnrecognizedKind { kind, .. }) if kind == "symlink"
        ));
    }

    #[test]
    fn test_file_without_download_url_is_rejected() {
        let result = RemoteNode::from_entry(raw("a.txt", "file", None));
        assert!(matches!(
            result,
            Err(FetchError::MissingDownloadUrl { name }) if name == "a.txt"
        ));
    }
}
