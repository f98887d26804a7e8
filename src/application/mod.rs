// SPDX-License-Identifier: MPL-2.0
//! Application layer - Use cases and orchestration.
//!
//! - [`port`]: Trait definitions for the backend collaborators
//! - [`catalog`]: Card games, versions, taxonomies and cards
//! - [`card_form`]: Card form validation and change detection
//! - [`upload`]: Card photo object paths and uploads
//! - [`session`]: Auth state and the protected-screen guard
//!
//! # Dependency Rule
//!
//! - Infrastructure implements the [`port`] traits
//! - Screens call catalog and session services, never an adapter directly
//!
//! # Example
//!
//! ```ignore
//! use kaitori_admin::application::catalog::Catalog;
//! use kaitori_admin::infrastructure::memory::MemoryDocumentStore;
//!
//! let catalog = Catalog::new(Arc::new(MemoryDocumentStore::new()));
//! let cards = catalog.cards("ポケモンカード", "151");
//! ```

pub mod card_form;
pub mod catalog;
pub mod port;
pub mod session;
pub mod upload;
