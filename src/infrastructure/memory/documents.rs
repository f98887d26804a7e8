// SPDX-License-Identifier: MPL-2.0
//! In-memory [`DocumentStore`] with live queries.
//!
//! Each collection carries a revision counter published through a
//! `tokio::sync::watch` channel. Live queries wait for their collection's
//! counter to move and re-run the query against the current state, so a
//! burst of writes can be coalesced into one emission but never missed.

use super::resolve_timestamp;
use crate::application::port::{
    Document, DocumentId, DocumentStore, FieldValue, Fields, Query, StoreError, StoreFuture,
};
use crate::infrastructure::snapshot;
use chrono::{DateTime, Utc};
use futures_util::future::{self, FutureExt};
use futures_util::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Snapshot file name inside the data directory.
pub const CATALOG_SNAPSHOT: &str = "catalog.cbor";

type Collection = BTreeMap<DocumentId, Fields>;
type Revisions = HashMap<String, u64>;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    collections: BTreeMap<String, Collection>,
}

#[derive(Debug, Default)]
struct State {
    collections: BTreeMap<String, Collection>,
    last_stamp: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct Inner {
    state: Mutex<State>,
    /// Held from encoding until the file is written, so snapshots reach the
    /// disk in write order without blocking readers.
    disk: Mutex<()>,
    revisions: watch::Sender<Revisions>,
    snapshot_path: Option<PathBuf>,
}

/// Document store kept in process memory, optionally mirrored to disk.
#[derive(Debug, Clone)]
pub struct MemoryDocumentStore {
    inner: Arc<Inner>,
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocumentStore {
    /// Creates an empty store without persistence.
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(State::default(), None)
    }

    /// Opens a store persisted at `path`.
    ///
    /// An unreadable snapshot is logged and replaced by an empty catalog on
    /// the next write.
    #[must_use]
    pub fn open(path: PathBuf) -> Self {
        let collections = match snapshot::load::<Snapshot>(&path) {
            Ok(Some(snapshot)) => snapshot.collections,
            Ok(None) => BTreeMap::new(),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "catalog snapshot unreadable, starting empty");
                BTreeMap::new()
            }
        };
        let documents: usize = collections.values().map(BTreeMap::len).sum();
        tracing::info!(path = %path.display(), documents, "catalog opened");
        Self::with_state(
            State {
                collections,
                last_stamp: None,
            },
            Some(path),
        )
    }

    fn with_state(state: State, snapshot_path: Option<PathBuf>) -> Self {
        let (revisions, _) = watch::channel(Revisions::new());
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                disk: Mutex::new(()),
                revisions,
                snapshot_path,
            }),
        }
    }

    /// Number of documents in `collection`.
    #[must_use]
    pub fn len(&self, collection: &str) -> usize {
        self.inner
            .lock()
            .collections
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    /// Whether `collection` holds no documents.
    #[must_use]
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies a write under the lock, then persists and bumps the revision.
    fn write<T>(
        &self,
        collection: &str,
        apply: impl FnOnce(&mut State) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        if collection.is_empty() {
            return Err(StoreError::InvalidArgument("empty collection name".into()));
        }
        let mut state = self.lock();
        let value = apply(&mut state)?;
        let encoded = self.snapshot_path.as_ref().map(|path| {
            let snapshot = SnapshotRef {
                collections: &state.collections,
            };
            (path, snapshot::encode(&snapshot))
        });
        let disk = encoded
            .is_some()
            .then(|| self.disk.lock().unwrap_or_else(PoisonError::into_inner));
        drop(state);

        if let Some((path, encoded)) = encoded {
            if let Err(err) = encoded.and_then(|bytes| snapshot::write_encoded(path, &bytes)) {
                tracing::error!(path = %path.display(), %err, "failed to persist catalog");
            }
        }
        drop(disk);

        self.revisions.send_modify(|revisions| {
            *revisions.entry(collection.to_string()).or_default() += 1;
        });
        Ok(value)
    }

    fn query(&self, query: &Query) -> Vec<Document> {
        let state = self.lock();
        let mut documents: Vec<Document> = state
            .collections
            .get(&query.collection)
            .into_iter()
            .flat_map(|collection| collection.iter())
            .filter(|(_, fields)| query.matches(fields))
            .map(|(id, fields)| Document {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect();
        drop(state);
        query.sort(&mut documents);
        documents
    }

    fn get(&self, collection: &str, id: &DocumentId) -> Option<Document> {
        self.lock()
            .collections
            .get(collection)
            .and_then(|documents| documents.get(id))
            .map(|fields| Document {
                id: id.clone(),
                fields: fields.clone(),
            })
    }
}

fn revision_of(receiver: &mut watch::Receiver<Revisions>, collection: &str) -> u64 {
    receiver
        .borrow_and_update()
        .get(collection)
        .copied()
        .unwrap_or(0)
}

/// Borrowed form of [`Snapshot`] so persisting does not clone the catalog.
#[derive(Serialize)]
struct SnapshotRef<'a> {
    collections: &'a BTreeMap<String, Collection>,
}

impl State {
    /// Monotonic clock for `ServerTimestamp`: two writes never share a stamp.
    fn now(&mut self) -> DateTime<Utc> {
        let now = resolve_timestamp(Utc::now(), self.last_stamp);
        self.last_stamp = Some(now);
        now
    }
}

/// One stamp shared by every `ServerTimestamp` of a write.
fn stamp_for(state: &mut State, fields: &Fields) -> Option<DateTime<Utc>> {
    fields
        .values()
        .any(|value| *value == FieldValue::ServerTimestamp)
        .then(|| state.now())
}

/// Live stream over `collection`: emits `project()` now and whenever the
/// collection's revision moves.
fn live<T, F>(inner: Arc<Inner>, collection: String, project: F) -> BoxStream<'static, T>
where
    T: Send + 'static,
    F: Fn(&Inner) -> T + Send + Sync + 'static,
{
    let receiver = inner.revisions.subscribe();
    let project = Arc::new(project);
    stream::unfold(
        (receiver, None::<u64>),
        move |(mut receiver, last_seen)| {
            let inner = Arc::clone(&inner);
            let collection = collection.clone();
            let project = Arc::clone(&project);
            async move {
                let mut waiting = last_seen.is_some();
                loop {
                    if waiting && receiver.changed().await.is_err() {
                        return None;
                    }
                    waiting = true;
                    let seen = revision_of(&mut receiver, &collection);
                    if last_seen == Some(seen) {
                        continue;
                    }
                    return Some((project(&inner), (receiver, Some(seen))));
                }
            }
        },
    )
    .boxed()
}

impl DocumentStore for MemoryDocumentStore {
    fn add(&self, collection: &str, fields: Fields) -> StoreFuture<DocumentId> {
        let result = self.inner.write(collection, |state| {
            if fields.values().any(|value| *value == FieldValue::Delete) {
                return Err(StoreError::InvalidArgument(
                    "delete sentinel is only valid in updates".into(),
                ));
            }
            let id = DocumentId::new(uuid::Uuid::new_v4().simple().to_string());
            let stamp = stamp_for(state, &fields);
            let resolved: Fields = fields
                .into_iter()
                .map(|(name, value)| match (value, stamp) {
                    (FieldValue::ServerTimestamp, Some(stamp)) => {
                        (name, FieldValue::Timestamp(stamp))
                    }
                    (value, _) => (name, value),
                })
                .collect();
            state
                .collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.clone(), resolved);
            Ok(id)
        });
        if let Ok(id) = &result {
            tracing::debug!(collection, %id, "document added");
        }
        future::ready(result).boxed()
    }

    fn update(&self, collection: &str, id: &DocumentId, fields: Fields) -> StoreFuture<()> {
        let result = self.inner.write(collection, |state| {
            let stamp = stamp_for(state, &fields);
            let document = state
                .collections
                .get_mut(collection)
                .and_then(|documents| documents.get_mut(id))
                .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))?;
            for (name, value) in fields {
                match value {
                    FieldValue::Delete => {
                        document.remove(&name);
                    }
                    FieldValue::ServerTimestamp => {
                        if let Some(stamp) = stamp {
                            document.insert(name, FieldValue::Timestamp(stamp));
                        }
                    }
                    value => {
                        document.insert(name, value);
                    }
                }
            }
            Ok(())
        });
        if result.is_ok() {
            tracing::debug!(collection, %id, "document updated");
        }
        future::ready(result).boxed()
    }

    fn delete(&self, collection: &str, id: &DocumentId) -> StoreFuture<()> {
        let result = self.inner.write(collection, |state| {
            if let Some(documents) = state.collections.get_mut(collection) {
                documents.remove(id);
            }
            Ok(())
        });
        if result.is_ok() {
            tracing::debug!(collection, %id, "document deleted");
        }
        future::ready(result).boxed()
    }

    fn get(&self, collection: &str, id: &DocumentId) -> StoreFuture<Option<Document>> {
        future::ready(Ok(self.inner.get(collection, id))).boxed()
    }

    fn subscribe(&self, query: Query) -> BoxStream<'static, Result<Vec<Document>, StoreError>> {
        let collection = query.collection.clone();
        live(Arc::clone(&self.inner), collection, move |inner| {
            Ok(inner.query(&query))
        })
    }

    fn watch(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> BoxStream<'static, Result<Option<Document>, StoreError>> {
        let name = collection.to_string();
        let id = id.clone();
        live(Arc::clone(&self.inner), collection.to_string(), move |inner| {
            Ok(inner.get(&name, &id))
        })
    }
}
