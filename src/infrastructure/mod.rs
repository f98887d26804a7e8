// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! Concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`memory`]: In-process document store and identity provider
//!   (implement [`DocumentStore`] and [`AuthProvider`])
//! - [`fs_blobs`]: Photo storage in a local directory (implements [`BlobStore`])
//! - [`snapshot`]: CBOR snapshot files shared by the in-process adapters
//!
//! [`DocumentStore`]: crate::application::port::DocumentStore
//! [`AuthProvider`]: crate::application::port::AuthProvider
//! [`BlobStore`]: crate::application::port::BlobStore

pub mod fs_blobs;
pub mod memory;
pub mod snapshot;

pub use fs_blobs::FsBlobStore;
pub use memory::{MemoryAuthProvider, MemoryDocumentStore};
