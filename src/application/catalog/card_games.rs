// SPDX-License-Identifier: MPL-2.0
//! Card game records.

use super::{
    field, fields, map_record, map_rows, required_name, text_or_default, timestamp, Catalog,
    LiveList, LiveRecord, CARD_GAME_COLLECTION,
};
use crate::application::port::{Direction, Document, DocumentId, FieldValue, Query, StoreError};
use chrono::{DateTime, Utc};

/// A card game title, the root of the catalog hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct CardGame {
    pub id: DocumentId,
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CardGame {
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: document.id.clone(),
            name: text_or_default(document, field::NAME),
            created_at: timestamp(document, field::CREATED_AT),
            updated_at: timestamp(document, field::UPDATED_AT),
        }
    }
}

impl Catalog {
    /// Live list of card games, newest first.
    pub fn card_games(&self) -> LiveList<CardGame> {
        let query = Query::collection(CARD_GAME_COLLECTION)
            .order_by(field::CREATED_AT, Direction::Descending);
        map_rows(self.store().subscribe(query), CardGame::from_document)
    }

    /// Live view of one card game.
    pub fn card_game(&self, id: &DocumentId) -> LiveRecord<CardGame> {
        map_record(
            self.store().watch(CARD_GAME_COLLECTION, id),
            CardGame::from_document,
        )
    }

    /// One-shot read of a card game.
    pub async fn get_card_game(&self, id: &DocumentId) -> Result<Option<CardGame>, StoreError> {
        let document = self.store().get(CARD_GAME_COLLECTION, id).await?;
        Ok(document.as_ref().map(CardGame::from_document))
    }

    /// Adds a card game.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidArgument`] when the trimmed name is empty.
    pub async fn add_card_game(&self, name: &str) -> Result<DocumentId, StoreError> {
        let name = required_name(name)
            .ok_or_else(|| StoreError::InvalidArgument("card game name is empty".into()))?;
        let id = self
            .store()
            .add(
                CARD_GAME_COLLECTION,
                fields([
                    (field::NAME, FieldValue::Text(name)),
                    (field::CREATED_AT, FieldValue::ServerTimestamp),
                    (field::UPDATED_AT, FieldValue::ServerTimestamp),
                ]),
            )
            .await?;
        tracing::info!(%id, "card game added");
        Ok(id)
    }

    /// Renames a card game and bumps its `updatedAt`.
    ///
    /// Versions and cards keep pointing at the old name.
    pub async fn rename_card_game(&self, id: &DocumentId, name: &str) -> Result<(), StoreError> {
        let name = required_name(name)
            .ok_or_else(|| StoreError::InvalidArgument("card game name is empty".into()))?;
        self.store()
            .update(
                CARD_GAME_COLLECTION,
                id,
                fields([
                    (field::NAME, FieldValue::Text(name)),
                    (field::UPDATED_AT, FieldValue::ServerTimestamp),
                ]),
            )
            .await?;
        tracing::info!(%id, "card game renamed");
        Ok(())
    }

    pub async fn delete_card_game(&self, id: &DocumentId) -> Result<(), StoreError> {
        self.store().delete(CARD_GAME_COLLECTION, id).await?;
        tracing::info!(%id, "card game deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn from_document_tolerates_missing_fields() {
        let document = Document {
            id: DocumentId::new("g1"),
            fields: Default::default(),
        };
        let game = CardGame::from_document(&document);
        assert_eq!(game.name, "");
        assert!(game.created_at.is_none());
    }

    #[test]
    fn from_document_reads_timestamps() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let document = Document {
            id: DocumentId::new("g1"),
            fields: fields([
                (field::NAME, "デュエマ".into()),
                (field::CREATED_AT, FieldValue::Timestamp(at)),
            ]),
        };
        let game = CardGame::from_document(&document);
        assert_eq!(game.name, "デュエマ");
        assert_eq!(game.created_at, Some(at));
        assert!(game.updated_at.is_none());
    }
}
