// SPDX-License-Identifier: MPL-2.0
//! Version (expansion set) records of a card game.

use super::{
    field, fields, map_rows, required_name, text_or_default, timestamp, Catalog, LiveList,
    VERSION_COLLECTION,
};
use crate::application::port::{Direction, Document, DocumentId, FieldValue, Query, StoreError};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Version {
    pub id: DocumentId,
    pub card_game_name: String,
    pub version_name: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Version {
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: document.id.clone(),
            card_game_name: text_or_default(document, field::CARD_GAME_NAME),
            version_name: text_or_default(document, field::VERSION_NAME),
            created_at: timestamp(document, field::CREATED_AT),
        }
    }
}

impl Catalog {
    /// Live list of the versions of `card_game_name`, newest first.
    pub fn versions(&self, card_game_name: &str) -> LiveList<Version> {
        let query = Query::collection(VERSION_COLLECTION)
            .where_eq(field::CARD_GAME_NAME, card_game_name)
            .order_by(field::CREATED_AT, Direction::Descending);
        map_rows(self.store().subscribe(query), Version::from_document)
    }

    pub async fn get_version(&self, id: &DocumentId) -> Result<Option<Version>, StoreError> {
        let document = self.store().get(VERSION_COLLECTION, id).await?;
        Ok(document.as_ref().map(Version::from_document))
    }

    /// Adds a version under `card_game_name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidArgument`] when either name is blank.
    pub async fn add_version(
        &self,
        card_game_name: &str,
        version_name: &str,
    ) -> Result<DocumentId, StoreError> {
        let (Some(game), Some(version)) = (required_name(card_game_name), required_name(version_name))
        else {
            return Err(StoreError::InvalidArgument("version name is empty".into()));
        };
        let id = self
            .store()
            .add(
                VERSION_COLLECTION,
                fields([
                    (field::CARD_GAME_NAME, FieldValue::Text(game)),
                    (field::VERSION_NAME, FieldValue::Text(version)),
                    (field::CREATED_AT, FieldValue::ServerTimestamp),
                ]),
            )
            .await?;
        tracing::info!(%id, "version added");
        Ok(id)
    }
}
