// SPDX-License-Identifier: MPL-2.0
//! Catalog use cases over the [`DocumentStore`] port.
//!
//! The catalog is a four-level hierarchy: card games, their versions, the
//! character and type taxonomies of a version, and the cards of a version.
//! Children reference their parents by *name* (`cardGameName`,
//! `versionName`), not by id, so renaming a card game does not move its
//! versions.
//!
//! Every list is exposed as a live stream: it yields the current rows
//! immediately and again after each write that touches the collection.
//!
//! # Example
//!
//! ```ignore
//! let catalog = Catalog::new(store);
//! let id = catalog.add_card_game("ポケモンカード").await?;
//! let mut games = catalog.card_games();
//! while let Some(rows) = games.next().await { /* render */ }
//! ```

mod card_games;
mod cards;
mod taxonomy;
mod versions;

pub use card_games::CardGame;
pub use cards::{sort_cards, CardFields, CardInfo};
pub use taxonomy::{Taxonomy, TaxonomyOption};
pub use versions::Version;

use crate::application::port::{Document, DocumentStore, FieldValue, Fields, StoreError};
use chrono::{DateTime, Utc};
use futures_util::stream::{BoxStream, StreamExt};
use std::fmt;
use std::sync::Arc;

// =============================================================================
// Collection and field names
// =============================================================================

pub const CARD_GAME_COLLECTION: &str = "CardGame_Name_Table";
pub const VERSION_COLLECTION: &str = "CardGame_Version_Table";
pub const CHARACTER_COLLECTION: &str = "CardKyara_Table";
pub const CARD_TYPE_COLLECTION: &str = "CardType_Table";
pub const CARD_INFO_COLLECTION: &str = "CardInfo_Table";

pub(crate) mod field {
    pub const NAME: &str = "name";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
    pub const CARD_GAME_NAME: &str = "cardGameName";
    pub const VERSION_NAME: &str = "versionName";
    pub const CHARACTER_NAME: &str = "cardKyaraName";
    pub const CARD_TYPE_NAME: &str = "cardTypeName";
    pub const CARD_NAME: &str = "cardName";
    pub const CARD_PHOTO: &str = "cardPhoto";
    pub const CARD_CHARACTER: &str = "cardKyara";
    pub const CARD_TYPE: &str = "cardType";
    pub const STORE_PRICE: &str = "storePrice";
    pub const MIN_PRICE: &str = "minPrice";
    pub const WANTED_QTY: &str = "wantedQty";
}

/// Live list of catalog records.
pub type LiveList<T> = BoxStream<'static, Result<Vec<T>, StoreError>>;

/// Live single catalog record; `None` once the record is deleted.
pub type LiveRecord<T> = BoxStream<'static, Result<Option<T>, StoreError>>;

// =============================================================================
// Catalog
// =============================================================================

/// Catalog service. Cheap to clone.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn DocumentStore>,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog").finish_non_exhaustive()
    }
}

impl Catalog {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub(crate) fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }
}

// =============================================================================
// Helpers shared by the record modules
// =============================================================================

/// Trims a required name, rejecting blank input.
pub(crate) fn required_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(crate) fn text_or_default(document: &Document, name: &str) -> String {
    document.text(name).unwrap_or_default().to_string()
}

pub(crate) fn optional_text(document: &Document, name: &str) -> Option<String> {
    document
        .text(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub(crate) fn timestamp(document: &Document, name: &str) -> Option<DateTime<Utc>> {
    document.timestamp(name)
}

pub(crate) fn fields<const N: usize>(pairs: [(&str, FieldValue); N]) -> Fields {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Maps every row of a live document list into a record.
pub(crate) fn map_rows<T, F>(
    stream: BoxStream<'static, Result<Vec<Document>, StoreError>>,
    map: F,
) -> LiveList<T>
where
    T: Send + 'static,
    F: Fn(&Document) -> T + Send + 'static,
{
    stream
        .map(move |result| result.map(|docs| docs.iter().map(&map).collect()))
        .boxed()
}

/// Maps a live single document into a record.
pub(crate) fn map_record<T, F>(
    stream: BoxStream<'static, Result<Option<Document>, StoreError>>,
    map: F,
) -> LiveRecord<T>
where
    T: Send + 'static,
    F: Fn(&Document) -> T + Send + 'static,
{
    stream
        .map(move |result| result.map(|doc| doc.as_ref().map(&map)))
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_name_trims_and_rejects_blank() {
        assert_eq!(required_name("  遊戯王 ").as_deref(), Some("遊戯王"));
        assert!(required_name("   ").is_none());
        assert!(required_name("").is_none());
    }
}
