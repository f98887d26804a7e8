// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for the backend collaborators.
//!
//! The console never talks to a concrete backend directly. Screens and
//! catalog services go through these capability traits, and infrastructure
//! adapters implement them.
//!
//! # Available Ports
//!
//! - [`auth`]: sign in, sign out, account registration, current-user stream
//! - [`documents`]: document CRUD and live-query subscriptions
//! - [`blobs`]: upload a blob and get a permanent URL back
//!
//! # Design Notes
//!
//! - Every operation returns a boxed `'static` future so callers can hand it
//!   straight to an Iced `Task` or a tracked action
//! - Live data is exposed as boxed streams; dropping the stream ends the
//!   subscription
//! - Traits are `Send + Sync` so adapters can be shared behind `Arc`

pub mod auth;
pub mod blobs;
pub mod documents;

pub use auth::{AuthError, AuthProvider, User};
pub use blobs::{BlobError, BlobStore};
pub use documents::{
    Direction, Document, DocumentId, DocumentStore, FieldValue, Fields, Filter, OrderBy, Query,
    StoreError, StoreFuture,
};

use futures_util::stream::{self, BoxStream, StreamExt};
use tokio::sync::watch;

/// Turns a watch receiver into a stream that yields the current value first
/// and then every subsequent change. The stream ends once the sender is gone.
pub fn watch_stream<T>(receiver: watch::Receiver<T>) -> BoxStream<'static, T>
where
    T: Clone + Send + Sync + 'static,
{
    stream::unfold((receiver, true), |(mut receiver, first)| async move {
        if !first && receiver.changed().await.is_err() {
            return None;
        }
        let value = receiver.borrow_and_update().clone();
        Some((value, (receiver, false)))
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn watch_stream_yields_current_then_changes() {
        let (sender, receiver) = watch::channel(1_u32);
        let mut values = watch_stream(receiver);

        assert_eq!(values.next().await, Some(1));
        sender.send_replace(2);
        assert_eq!(values.next().await, Some(2));
        drop(sender);
        assert_eq!(values.next().await, None);
    }
}
