// SPDX-License-Identifier: MPL-2.0
//! Backend wiring: builds the adapters behind the ports.
//!
//! All three adapters share one data directory:
//!
//! ```text
//! <data_dir>/
//! ├── catalog.cbor     # documents
//! ├── accounts.cbor    # accounts and the last session
//! └── blobs/           # uploaded card photos
//! ```

use crate::app::config::Config;
use crate::app::paths;
use crate::application::catalog::Catalog;
use crate::application::port::{AuthProvider, BlobStore};
use crate::error::{Error, Result};
use crate::infrastructure::fs_blobs::BLOB_DIR;
use crate::infrastructure::memory::{ACCOUNTS_SNAPSHOT, CATALOG_SNAPSHOT};
use crate::infrastructure::{FsBlobStore, MemoryAuthProvider, MemoryDocumentStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Handles to the backend collaborators, shared by every screen.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthProvider>,
    pub catalog: Catalog,
    pub blobs: Arc<dyn BlobStore>,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

impl Services {
    /// Opens the persistent local backend configured in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if no data directory can be resolved or created.
    pub fn open(config: &Config) -> Result<Self> {
        let data_dir = paths::get_app_data_dir_with_override(config.backend.data_dir.clone())
            .ok_or_else(|| Error::Io("no data directory available".to_string()))?;
        std::fs::create_dir_all(&data_dir)?;
        let services = Self::open_in(&data_dir, config);
        tracing::info!(data_dir = %data_dir.display(), "backend opened");
        Ok(services)
    }

    /// Opens the local backend rooted at `data_dir`.
    pub fn open_in(data_dir: &Path, config: &Config) -> Self {
        let documents = MemoryDocumentStore::open(data_dir.join(CATALOG_SNAPSHOT));
        let auth = MemoryAuthProvider::open(data_dir.join(ACCOUNTS_SNAPSHOT));
        if let Some(seed) = &config.backend.seed_admin {
            auth.seed(seed);
        }
        Self {
            auth: Arc::new(auth),
            catalog: Catalog::new(Arc::new(documents)),
            blobs: Arc::new(FsBlobStore::new(data_dir.join(BLOB_DIR))),
        }
    }

    /// Backend that forgets everything on exit. Photos go to `blob_root`.
    pub fn ephemeral(blob_root: PathBuf, config: &Config) -> Self {
        let auth = MemoryAuthProvider::new();
        if let Some(seed) = &config.backend.seed_admin {
            auth.seed(seed);
        }
        Self {
            auth: Arc::new(auth),
            catalog: Catalog::new(Arc::new(MemoryDocumentStore::new())),
            blobs: Arc::new(FsBlobStore::new(blob_root)),
        }
    }
}
