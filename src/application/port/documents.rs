// SPDX-License-Identifier: MPL-2.0
//! Document store port definition.
//!
//! Documents are schemaless field maps grouped in named collections. The
//! port mirrors what the catalog screens need from a managed document
//! database: add with a generated id, patch, delete, point reads, and live
//! queries with equality filters and a single ordering.

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// =============================================================================
// StoreError
// =============================================================================

/// Errors reported by a [`DocumentStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The addressed document does not exist.
    #[error("document not found: {0}")]
    NotFound(String),

    /// The request was malformed (empty collection name, sentinel misuse, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The store could not be reached or failed internally.
    #[error("document store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Returns the i18n key shown to the user for this error.
    #[must_use]
    pub fn i18n_key(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "error-store-not-found",
            StoreError::InvalidArgument(_) => "error-store-invalid",
            StoreError::Unavailable(_) => "error-store-unavailable",
        }
    }
}

// =============================================================================
// Field values
// =============================================================================

/// A single field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Timestamp(DateTime<Utc>),
    /// Write sentinel: replaced by the store's clock when the write is applied.
    ServerTimestamp,
    /// Update sentinel: removes the field.
    Delete,
}

impl FieldValue {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(value) => Some(*value),
            _ => None,
        }
    }

    /// Whether this value is a write sentinel rather than stored data.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        matches!(self, FieldValue::ServerTimestamp | FieldValue::Delete)
    }

    /// Total order used by queries. Values of different kinds order by kind
    /// (integers, then timestamps, then text).
    #[must_use]
    pub fn query_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Integer(_) => 0,
            FieldValue::Timestamp(_) => 1,
            FieldValue::Text(_) => 2,
            FieldValue::ServerTimestamp | FieldValue::Delete => 3,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

/// Field map of a document.
pub type Fields = BTreeMap<String, FieldValue>;

// =============================================================================
// Documents
// =============================================================================

/// Identifier of a document inside its collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub fields: Fields,
}

impl Document {
    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(FieldValue::as_text)
    }

    #[must_use]
    pub fn integer(&self, field: &str) -> Option<i64> {
        self.fields.get(field).and_then(FieldValue::as_integer)
    }

    #[must_use]
    pub fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        self.fields.get(field).and_then(FieldValue::as_timestamp)
    }
}

// =============================================================================
// Queries
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Equality filter on one field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// A live query over one collection.
///
/// Documents missing the `order_by` field are still returned; they sort
/// after every document that has it, whatever the direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: String,
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
}

impl Query {
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            collection: name.into(),
            filters: Vec::new(),
            order_by: None,
        }
    }

    #[must_use]
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    /// Whether a document's fields satisfy every filter.
    #[must_use]
    pub fn matches(&self, fields: &Fields) -> bool {
        self.filters
            .iter()
            .all(|filter| fields.get(&filter.field) == Some(&filter.value))
    }

    /// Sorts documents according to `order_by`. Without an ordering the
    /// input order is kept.
    pub fn sort(&self, documents: &mut [Document]) {
        let Some(order) = &self.order_by else {
            return;
        };
        documents.sort_by(|a, b| {
            match (a.fields.get(&order.field), b.fields.get(&order.field)) {
                (Some(x), Some(y)) => match order.direction {
                    Direction::Ascending => x.query_cmp(y),
                    Direction::Descending => y.query_cmp(x),
                },
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
    }
}

// =============================================================================
// DocumentStore Trait
// =============================================================================

/// Future returned by document store operations.
pub type StoreFuture<T> = BoxFuture<'static, Result<T, StoreError>>;

/// Port for the document database.
///
/// # Live queries
///
/// `subscribe` and `watch` yield the current result immediately and then a
/// fresh result after every write that may affect it. Dropping the stream
/// cancels the subscription.
pub trait DocumentStore: Send + Sync {
    /// Adds a document with a generated id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidArgument`] if `fields` contains a
    /// [`FieldValue::Delete`] sentinel.
    fn add(&self, collection: &str, fields: Fields) -> StoreFuture<DocumentId>;

    /// Merges `fields` into an existing document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the document does not exist.
    fn update(&self, collection: &str, id: &DocumentId, fields: Fields) -> StoreFuture<()>;

    /// Deletes a document. Deleting a missing document succeeds.
    fn delete(&self, collection: &str, id: &DocumentId) -> StoreFuture<()>;

    /// Reads a single document.
    fn get(&self, collection: &str, id: &DocumentId) -> StoreFuture<Option<Document>>;

    /// Subscribes to the result set of `query`.
    fn subscribe(&self, query: Query) -> BoxStream<'static, Result<Vec<Document>, StoreError>>;

    /// Subscribes to a single document.
    fn watch(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> BoxStream<'static, Result<Option<Document>, StoreError>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn doc(id: &str, fields: &[(&str, FieldValue)]) -> Document {
        Document {
            id: DocumentId::new(id),
            fields: fields
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn query_matches_all_equality_filters() {
        let query = Query::collection("cards")
            .where_eq("game", "A")
            .where_eq("version", "1");

        let hit = doc("x", &[("game", "A".into()), ("version", "1".into())]);
        let miss = doc("y", &[("game", "A".into()), ("version", "2".into())]);

        assert!(query.matches(&hit.fields));
        assert!(!query.matches(&miss.fields));
    }

    #[test]
    fn descending_sort_puts_missing_fields_last() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut docs = vec![
            doc("none", &[]),
            doc("early", &[("createdAt", FieldValue::Timestamp(early))]),
            doc("late", &[("createdAt", FieldValue::Timestamp(late))]),
        ];

        Query::collection("games")
            .order_by("createdAt", Direction::Descending)
            .sort(&mut docs);

        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["late", "early", "none"]);
    }

    #[test]
    fn ascending_sort_orders_text() {
        let mut docs = vec![
            doc("b", &[("name", "ピカチュウ".into())]),
            doc("a", &[("name", "イーブイ".into())]),
        ];
        Query::collection("kyara")
            .order_by("name", Direction::Ascending)
            .sort(&mut docs);
        assert_eq!(docs[0].id.as_str(), "a");
    }

    #[test]
    fn sentinels_are_flagged() {
        assert!(FieldValue::ServerTimestamp.is_sentinel());
        assert!(FieldValue::Delete.is_sentinel());
        assert!(!FieldValue::Integer(3).is_sentinel());
    }
}
