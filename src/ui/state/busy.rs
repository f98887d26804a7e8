// SPDX-License-Identifier: MPL-2.0
//! In-flight operation counter backing the full-screen busy overlay.
//!
//! Any number of asynchronous actions can register with a [`BusyTracker`];
//! the application is busy while at least one of them has not settled.
//! The counter is only ever changed through [`BusyGuard`]: acquiring a guard
//! increments it and dropping the guard decrements it, so every exit path of
//! a tracked action (success, error, panic, cancellation) releases exactly
//! once.
//!
//! # Example
//!
//! ```
//! use kaitori_admin::ui::state::BusyTracker;
//!
//! # let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # runtime.block_on(async {
//! let busy = BusyTracker::new();
//! let save = busy.run_tracked(|| async { Ok::<_, String>(42) });
//! assert!(busy.is_busy());
//! assert_eq!(save.await, Ok(42));
//! assert!(!busy.is_busy());
//! # });
//! ```
//!
//! The tracker cannot see actions that bypass it. A screen that calls the
//! backend without [`BusyTracker::run_tracked`] simply does not show the
//! overlay.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Shared counter of in-flight operations.
///
/// Cloning yields another handle to the same counter.
#[derive(Debug, Clone)]
pub struct BusyTracker {
    count: Arc<watch::Sender<usize>>,
}

impl Default for BusyTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl BusyTracker {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);
        Self {
            count: Arc::new(sender),
        }
    }

    /// Registers one in-flight operation until the returned guard is dropped.
    #[must_use = "the operation is released as soon as the guard is dropped"]
    pub fn acquire(&self) -> BusyGuard {
        self.count.send_modify(|count| *count += 1);
        BusyGuard {
            count: Arc::clone(&self.count),
        }
    }

    /// Runs `action` as a tracked operation.
    ///
    /// The counter is incremented before `action` is invoked, so the tracker
    /// reports busy as soon as this call returns, even before the returned
    /// future is first polled. It is decremented once the action's future
    /// completes or is dropped. If `action` itself panics the increment is
    /// released during unwinding.
    ///
    /// The action's output is returned unchanged; errors are never swallowed.
    pub fn run_tracked<F, Fut, T>(&self, action: F) -> impl Future<Output = T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let guard = self.acquire();
        let operation = action();
        async move {
            let _guard = guard;
            operation.await
        }
    }

    /// Number of operations currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        *self.count.borrow()
    }

    /// Whether at least one tracked operation has not settled yet.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }

    /// Observes counter changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.count.subscribe()
    }

    /// Resolves once no operation is in flight.
    pub async fn idle(&self) {
        let mut receiver = self.count.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = receiver.wait_for(|count| *count == 0).await;
    }
}

/// Registration of one in-flight operation.
///
/// Dropping the guard releases the registration. Guards are not `Clone`, so
/// each increment is matched by exactly one decrement.
#[derive(Debug)]
pub struct BusyGuard {
    count: Arc<watch::Sender<usize>>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.count.send_modify(|count| {
            debug_assert!(*count > 0, "busy counter released more often than acquired");
            *count = count.saturating_sub(1);
        });
    }
}
