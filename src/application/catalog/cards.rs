// SPDX-License-Identifier: MPL-2.0
//! Card records and their buy-price ordering.

use super::{
    field, map_rows, optional_text, text_or_default, timestamp, Catalog, LiveList,
    CARD_INFO_COLLECTION,
};
use crate::application::port::{Document, DocumentId, FieldValue, Fields, Query, StoreError};
use chrono::{DateTime, Utc};
use futures_util::stream::StreamExt;
use std::cmp::Ordering;

/// A card with its buy prices.
#[derive(Debug, Clone, PartialEq)]
pub struct CardInfo {
    pub id: DocumentId,
    pub card_game_name: String,
    pub version_name: String,
    pub card_name: String,
    pub card_photo: Option<String>,
    pub card_character: Option<String>,
    pub card_type: Option<String>,
    pub store_price: Option<i64>,
    pub min_price: Option<i64>,
    pub wanted_qty: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CardInfo {
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: document.id.clone(),
            card_game_name: text_or_default(document, field::CARD_GAME_NAME),
            version_name: text_or_default(document, field::VERSION_NAME),
            card_name: text_or_default(document, field::CARD_NAME),
            card_photo: optional_text(document, field::CARD_PHOTO),
            card_character: optional_text(document, field::CARD_CHARACTER),
            card_type: optional_text(document, field::CARD_TYPE),
            store_price: document.integer(field::STORE_PRICE),
            min_price: document.integer(field::MIN_PRICE),
            wanted_qty: document.integer(field::WANTED_QTY),
            created_at: timestamp(document, field::CREATED_AT),
            updated_at: timestamp(document, field::UPDATED_AT),
        }
    }

    /// Editable part of the card.
    #[must_use]
    pub fn editable_fields(&self) -> CardFields {
        CardFields {
            card_name: self.card_name.clone(),
            card_photo: self.card_photo.clone(),
            card_character: self.card_character.clone(),
            card_type: self.card_type.clone(),
            store_price: self.store_price,
            min_price: self.min_price,
            wanted_qty: self.wanted_qty,
        }
    }
}

/// Validated, editable card content.
///
/// `None` means "not set". On update, a `None` photo keeps the stored
/// photo while every other `None` removes the stored field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFields {
    pub card_name: String,
    pub card_photo: Option<String>,
    pub card_character: Option<String>,
    pub card_type: Option<String>,
    pub store_price: Option<i64>,
    pub min_price: Option<i64>,
    pub wanted_qty: Option<i64>,
}

impl CardFields {
    /// Payload for a new card: unset optionals are omitted.
    fn insert_payload(&self, card_game_name: &str, version_name: &str) -> Fields {
        let mut fields = Fields::new();
        fields.insert(field::CARD_GAME_NAME.into(), card_game_name.into());
        fields.insert(field::VERSION_NAME.into(), version_name.into());
        fields.insert(field::CARD_NAME.into(), self.card_name.as_str().into());
        for (name, value) in self.optional_values() {
            if let Some(value) = value {
                fields.insert(name.into(), value);
            }
        }
        fields.insert(field::CREATED_AT.into(), FieldValue::ServerTimestamp);
        fields.insert(field::UPDATED_AT.into(), FieldValue::ServerTimestamp);
        fields
    }

    /// Patch for an existing card: unset optionals are deleted.
    fn update_payload(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(field::CARD_NAME.into(), self.card_name.as_str().into());
        for (name, value) in self.optional_values() {
            match value {
                Some(value) => fields.insert(name.into(), value),
                None if name == field::CARD_PHOTO => continue,
                None => fields.insert(name.into(), FieldValue::Delete),
            };
        }
        fields.insert(field::UPDATED_AT.into(), FieldValue::ServerTimestamp);
        fields
    }

    fn optional_values(&self) -> [(&'static str, Option<FieldValue>); 6] {
        let text = |value: &Option<String>| value.clone().map(FieldValue::Text);
        [
            (field::CARD_PHOTO, text(&self.card_photo)),
            (field::CARD_CHARACTER, text(&self.card_character)),
            (field::CARD_TYPE, text(&self.card_type)),
            (field::STORE_PRICE, self.store_price.map(FieldValue::Integer)),
            (field::MIN_PRICE, self.min_price.map(FieldValue::Integer)),
            (field::WANTED_QTY, self.wanted_qty.map(FieldValue::Integer)),
        ]
    }
}

/// Buy-price ordering: store price descending, then minimum price
/// descending, then card name ascending. Missing prices rank lowest.
pub fn sort_cards(cards: &mut [CardInfo]) {
    cards.sort_by(compare_cards);
}

fn compare_cards(a: &CardInfo, b: &CardInfo) -> Ordering {
    // `None < Some(_)` for `Option`, so reversing puts missing prices last.
    b.store_price
        .cmp(&a.store_price)
        .then_with(|| b.min_price.cmp(&a.min_price))
        .then_with(|| compare_names(&a.card_name, &b.card_name))
}

/// Kana-insensitive name order: katakana sorts with its hiragana reading,
/// full-width ASCII with its half-width form, and case is ignored. Names
/// equal under that folding fall back to code point order.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(fold_for_collation)
        .cmp(b.chars().map(fold_for_collation))
        .then_with(|| a.cmp(b))
}

fn fold_for_collation(c: char) -> char {
    let folded = match c {
        'ァ'..='ヶ' => char::from_u32(c as u32 - 0x60),
        '！'..='～' => char::from_u32(c as u32 - 0xFEE0),
        _ => None,
    };
    folded.unwrap_or(c).to_ascii_lowercase()
}

impl Catalog {
    /// Live list of the cards of a version in buy-price order.
    pub fn cards(&self, card_game_name: &str, version_name: &str) -> LiveList<CardInfo> {
        let query = Query::collection(CARD_INFO_COLLECTION)
            .where_eq(field::CARD_GAME_NAME, card_game_name)
            .where_eq(field::VERSION_NAME, version_name);
        map_rows(self.store().subscribe(query), CardInfo::from_document)
            .map(|result| {
                result.map(|mut cards| {
                    sort_cards(&mut cards);
                    cards
                })
            })
            .boxed()
    }

    pub async fn get_card(&self, id: &DocumentId) -> Result<Option<CardInfo>, StoreError> {
        let document = self.store().get(CARD_INFO_COLLECTION, id).await?;
        Ok(document.as_ref().map(CardInfo::from_document))
    }

    pub async fn add_card(
        &self,
        card_game_name: &str,
        version_name: &str,
        card: &CardFields,
    ) -> Result<DocumentId, StoreError> {
        if card.card_name.trim().is_empty() {
            return Err(StoreError::InvalidArgument("card name is empty".into()));
        }
        let id = self
            .store()
            .add(
                CARD_INFO_COLLECTION,
                card.insert_payload(card_game_name, version_name),
            )
            .await?;
        tracing::info!(%id, "card added");
        Ok(id)
    }

    pub async fn update_card(&self, id: &DocumentId, card: &CardFields) -> Result<(), StoreError> {
        if card.card_name.trim().is_empty() {
            return Err(StoreError::InvalidArgument("card name is empty".into()));
        }
        self.store()
            .update(CARD_INFO_COLLECTION, id, card.update_payload())
            .await?;
        tracing::info!(%id, "card updated");
        Ok(())
    }

    pub async fn delete_card(&self, id: &DocumentId) -> Result<(), StoreError> {
        self.store().delete(CARD_INFO_COLLECTION, id).await?;
        tracing::info!(%id, "card deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str, store_price: Option<i64>, min_price: Option<i64>) -> CardInfo {
        CardInfo {
            id: DocumentId::new(name),
            card_game_name: "game".into(),
            version_name: "v1".into(),
            card_name: name.into(),
            card_photo: None,
            card_character: None,
            card_type: None,
            store_price,
            min_price,
            wanted_qty: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn names(cards: &[CardInfo]) -> Vec<&str> {
        cards.iter().map(|c| c.card_name.as_str()).collect()
    }

    #[test]
    fn cards_sort_by_store_price_then_min_price_then_name() {
        let mut cards = vec![
            card("C", Some(100), None),
            card("B", Some(500), Some(10)),
            card("A", Some(500), Some(10)),
            card("D", Some(500), Some(300)),
            card("E", None, Some(9999)),
        ];
        sort_cards(&mut cards);
        assert_eq!(names(&cards), ["D", "A", "B", "C", "E"]);
    }

    #[test]
    fn name_tie_break_ignores_kana_script_and_width() {
        let mut cards = vec![
            card("ミュウ", Some(100), None),
            card("ぴかちゅう", Some(100), None),
            card("イーブイ", Some(100), None),
            card("Ｚｅｋｒｏｍ", Some(100), None),
            card("arceus", Some(100), None),
        ];
        sort_cards(&mut cards);
        assert_eq!(
            names(&cards),
            ["arceus", "Ｚｅｋｒｏｍ", "イーブイ", "ぴかちゅう", "ミュウ"]
        );
    }

    #[test]
    fn names_equal_after_folding_keep_a_stable_order() {
        assert_eq!(compare_names("ピカチュウ", "ぴかちゅう"), Ordering::Greater);
        assert_eq!(compare_names("ぴかちゅう", "ピカチュウ"), Ordering::Less);
        assert_eq!(compare_names("ピカチュウ", "ピカチュウ"), Ordering::Equal);
    }

    #[test]
    fn zero_price_ranks_above_missing_price() {
        let mut cards = vec![card("missing", None, None), card("zero", Some(0), None)];
        sort_cards(&mut cards);
        assert_eq!(names(&cards), ["zero", "missing"]);
    }

    #[test]
    fn insert_payload_omits_unset_optionals() {
        let fields = CardFields {
            card_name: "リザードン".into(),
            store_price: Some(12000),
            ..Default::default()
        };
        let payload = fields.insert_payload("ポケカ", "151");
        assert_eq!(payload.get(field::STORE_PRICE), Some(&FieldValue::Integer(12000)));
        assert!(!payload.contains_key(field::MIN_PRICE));
        assert!(!payload.contains_key(field::CARD_PHOTO));
        assert_eq!(payload.get(field::CREATED_AT), Some(&FieldValue::ServerTimestamp));
    }

    #[test]
    fn update_payload_deletes_cleared_fields_but_keeps_photo() {
        let fields = CardFields {
            card_name: "リザードン".into(),
            ..Default::default()
        };
        let payload = fields.update_payload();
        assert_eq!(payload.get(field::STORE_PRICE), Some(&FieldValue::Delete));
        assert_eq!(payload.get(field::CARD_TYPE), Some(&FieldValue::Delete));
        assert!(!payload.contains_key(field::CARD_PHOTO));
        assert!(!payload.contains_key(field::CREATED_AT));
    }

    #[test]
    fn editable_fields_mirror_record() {
        let mut record = card("ピカチュウ", Some(300), Some(200));
        record.card_photo = Some("file:///tmp/p.jpg".into());
        let fields = record.editable_fields();
        assert_eq!(fields.card_name, "ピカチュウ");
        assert_eq!(fields.store_price, Some(300));
        assert_eq!(fields.card_photo.as_deref(), Some("file:///tmp/p.jpg"));
    }
}
