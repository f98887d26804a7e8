// SPDX-License-Identifier: MPL-2.0
//! Blob storage port definition.

use futures_util::future::BoxFuture;
use thiserror::Error;

/// Errors reported by a [`BlobStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlobError {
    /// The object path is empty or escapes the store root.
    #[error("invalid object path: {0}")]
    InvalidPath(String),

    /// Writing the object failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// The storage service could not be reached.
    #[error("blob storage unavailable: {0}")]
    Unavailable(String),
}

/// Port for uploading binary objects (card photos).
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` at `path` and returns a permanent URL for the object.
    ///
    /// Uploading to an existing path replaces the object.
    ///
    /// # Errors
    ///
    /// Returns a [`BlobError`] if the path is rejected or the write fails.
    fn upload(&self, path: &str, bytes: Vec<u8>) -> BoxFuture<'static, Result<String, BlobError>>;
}
