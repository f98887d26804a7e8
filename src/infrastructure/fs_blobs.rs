// SPDX-License-Identifier: MPL-2.0
//! [`BlobStore`] backed by a local directory.

use crate::application::port::{BlobError, BlobStore};
use futures_util::future::{BoxFuture, FutureExt};
use std::path::{Component, Path, PathBuf};
use url::Url;

/// Sub-directory of the data directory holding uploaded objects.
pub const BLOB_DIR: &str = "blobs";

/// Stores objects as files under a root directory and hands out `file://`
/// URLs.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps an object path to a file below the root.
    ///
    /// # Errors
    ///
    /// Rejects empty paths and any component other than a plain name
    /// (`..`, `.`, roots and prefixes).
    pub fn resolve(&self, object_path: &str) -> Result<PathBuf, BlobError> {
        let relative = Path::new(object_path);
        if object_path.trim().is_empty()
            || !relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)))
        {
            return Err(BlobError::InvalidPath(object_path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

/// Percent-encoded `file://` URL of an absolute path; `None` for relative
/// paths.
#[must_use]
pub fn file_url(path: &Path) -> Option<String> {
    Url::from_file_path(path).ok().map(String::from)
}

/// Local path behind a `file://` URL; `None` for any other scheme or a URL
/// that does not parse.
#[must_use]
pub fn path_from_url(url: &str) -> Option<PathBuf> {
    let url = Url::parse(url).ok()?;
    if url.scheme() != "file" {
        return None;
    }
    url.to_file_path().ok()
}

impl BlobStore for FsBlobStore {
    fn upload(&self, path: &str, bytes: Vec<u8>) -> BoxFuture<'static, Result<String, BlobError>> {
        let target = self.resolve(path);
        async move {
            let target = target?;
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|err| BlobError::Io(err.to_string()))?;
            }
            tokio::fs::write(&target, &bytes)
                .await
                .map_err(|err| BlobError::Io(err.to_string()))?;
            let absolute = match tokio::fs::canonicalize(&target).await {
                Ok(absolute) => absolute,
                Err(_) => std::path::absolute(&target)
                    .map_err(|err| BlobError::Io(err.to_string()))?,
            };
            tracing::debug!(path = %absolute.display(), bytes = bytes.len(), "blob written");
            file_url(&absolute)
                .ok_or_else(|| BlobError::InvalidPath(absolute.display().to_string()))
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn traversal_is_rejected() {
        let store = FsBlobStore::new("/data/blobs");
        for bad in ["", "  ", "../x.jpg", "a/../../x.jpg", "/etc/passwd", "./a.jpg"] {
            assert!(
                matches!(store.resolve(bad), Err(BlobError::InvalidPath(_))),
                "{bad:?} should be rejected"
            );
        }
        assert_eq!(
            store.resolve("cardImages/ポケカ/151/a_1.jpg").unwrap(),
            PathBuf::from("/data/blobs/cardImages/ポケカ/151/a_1.jpg")
        );
    }

    #[cfg(unix)]
    #[test]
    fn file_urls_round_trip_to_paths() {
        let url = file_url(Path::new("/tmp/blobs/a.jpg")).unwrap();
        assert_eq!(url, "file:///tmp/blobs/a.jpg");
        assert_eq!(path_from_url(&url), Some(PathBuf::from("/tmp/blobs/a.jpg")));
        assert_eq!(path_from_url("https://example.com/a.jpg"), None);
        assert_eq!(path_from_url("not a url"), None);
    }

    #[cfg(unix)]
    #[test]
    fn reserved_characters_in_names_are_escaped() {
        let path = Path::new("/tmp/blobs/ポケカ #1/100% off/ピカチュウ ex.jpg");
        let url = file_url(path).unwrap();
        assert!(!url.contains(' '));
        assert!(!url.contains('#'));
        assert!(url.contains("%23"));
        assert!(url.contains("%25"));
        assert_eq!(path_from_url(&url), Some(path.to_path_buf()));
    }

    #[test]
    fn relative_paths_have_no_url() {
        assert_eq!(file_url(Path::new("blobs/a.jpg")), None);
    }

    #[tokio::test]
    async fn upload_writes_file_and_returns_url() {
        let dir = tempdir().expect("temp dir");
        let store = FsBlobStore::new(dir.path());

        let url = store
            .upload("cardImages/g/v/card_1.jpg", vec![1, 2, 3])
            .await
            .expect("upload");

        let path = path_from_url(&url).expect("file url");
        assert_eq!(std::fs::read(path).expect("read"), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn upload_url_survives_reserved_characters() {
        let dir = tempdir().expect("temp dir");
        let store = FsBlobStore::new(dir.path());

        let url = store
            .upload("cardImages/ポケカ #1/100% 限定/card 1.jpg", vec![7])
            .await
            .expect("upload");

        assert!(!url.contains('#'));
        let path = path_from_url(&url).expect("file url");
        assert!(path.ends_with("cardImages/ポケカ #1/100% 限定/card 1.jpg"));
        assert_eq!(std::fs::read(path).expect("read"), vec![7]);
    }

    #[tokio::test]
    async fn upload_replaces_existing_object() {
        let dir = tempdir().expect("temp dir");
        let store = FsBlobStore::new(dir.path());
        store.upload("a.jpg", vec![1]).await.unwrap();
        let url = store.upload("a.jpg", vec![2]).await.unwrap();
        let path = path_from_url(&url).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), vec![2]);
    }
}
