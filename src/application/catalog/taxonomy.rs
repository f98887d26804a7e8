// SPDX-License-Identifier: MPL-2.0
//! Character and card type taxonomies, scoped to a (game, version) pair.
//!
//! Both taxonomies share one shape: a name keyed by game and version. They
//! feed the pickers of the card forms.

use super::{
    field, fields, map_rows, required_name, text_or_default, Catalog, LiveList,
    CARD_TYPE_COLLECTION, CHARACTER_COLLECTION,
};
use crate::application::port::{Direction, Document, DocumentId, FieldValue, Query, StoreError};
use futures_util::stream::{self, StreamExt};

/// Which taxonomy a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Taxonomy {
    Character,
    CardType,
}

impl Taxonomy {
    fn collection(self) -> &'static str {
        match self {
            Taxonomy::Character => CHARACTER_COLLECTION,
            Taxonomy::CardType => CARD_TYPE_COLLECTION,
        }
    }

    fn name_field(self) -> &'static str {
        match self {
            Taxonomy::Character => field::CHARACTER_NAME,
            Taxonomy::CardType => field::CARD_TYPE_NAME,
        }
    }
}

/// A picker option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyOption {
    pub id: DocumentId,
    pub name: String,
}

impl TaxonomyOption {
    fn from_document(taxonomy: Taxonomy, document: &Document) -> Self {
        Self {
            id: document.id.clone(),
            name: text_or_default(document, taxonomy.name_field()),
        }
    }
}

impl std::fmt::Display for TaxonomyOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl Catalog {
    /// Live options of a taxonomy, ordered by name.
    ///
    /// Yields a single empty list when either key is blank.
    pub fn taxonomy_options(
        &self,
        taxonomy: Taxonomy,
        card_game_name: &str,
        version_name: &str,
    ) -> LiveList<TaxonomyOption> {
        if card_game_name.trim().is_empty() || version_name.trim().is_empty() {
            return stream::once(async { Ok(Vec::new()) }).boxed();
        }
        let query = Query::collection(taxonomy.collection())
            .where_eq(field::CARD_GAME_NAME, card_game_name)
            .where_eq(field::VERSION_NAME, version_name)
            .order_by(taxonomy.name_field(), Direction::Ascending);
        map_rows(self.store().subscribe(query), move |document| {
            TaxonomyOption::from_document(taxonomy, document)
        })
    }

    /// Adds a taxonomy entry and returns it as a picker option.
    pub async fn add_taxonomy_option(
        &self,
        taxonomy: Taxonomy,
        card_game_name: &str,
        version_name: &str,
        name: &str,
    ) -> Result<TaxonomyOption, StoreError> {
        let (Some(game), Some(version), Some(name)) = (
            required_name(card_game_name),
            required_name(version_name),
            required_name(name),
        ) else {
            return Err(StoreError::InvalidArgument("taxonomy entry is incomplete".into()));
        };
        let id = self
            .store()
            .add(
                taxonomy.collection(),
                fields([
                    (field::CARD_GAME_NAME, FieldValue::Text(game)),
                    (field::VERSION_NAME, FieldValue::Text(version)),
                    (taxonomy.name_field(), FieldValue::Text(name.clone())),
                    (field::CREATED_AT, FieldValue::ServerTimestamp),
                ]),
            )
            .await?;
        tracing::info!(%id, ?taxonomy, "taxonomy option added");
        Ok(TaxonomyOption { id, name })
    }
}
