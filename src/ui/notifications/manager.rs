// SPDX-License-Identifier: MPL-2.0
//! Notification lifecycle management.
//!
//! The `Manager` keeps the ordered list of live notifications. Every push
//! schedules a one-shot timer on the tokio runtime that removes exactly that
//! notification (by id) once its lifetime has elapsed. Insertion order is
//! display order, there is no cap, and removals never reorder the remaining
//! entries.
//!
//! Each entry also records its deadline. [`Manager::visible`] hides entries
//! whose deadline has passed even if their timer has not run yet, and
//! [`Manager::tick`] drops them; this keeps the queue correct when no runtime
//! is available to host the timers.

use super::notification::{Notification, NotificationId, Severity};
use crate::ui::state::NotificationTtl;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::AbortHandle;
use tokio::time::Instant;

/// Messages for notification state changes.
#[derive(Debug, Clone)]
pub enum Message {
    /// Dismiss a specific notification by ID.
    Dismiss(NotificationId),
    /// Periodic sweep of expired notifications.
    Tick,
}

#[derive(Debug)]
struct Entry {
    notification: Notification,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct Queue {
    entries: Vec<Entry>,
    timers: HashMap<NotificationId, AbortHandle>,
}

impl Queue {
    /// Removes an entry before its timer fired. The timer is cancelled first.
    fn cancel(&mut self, id: NotificationId) -> bool {
        if let Some(timer) = self.timers.remove(&id) {
            timer.abort();
        }
        self.remove_entry(id)
    }

    /// Called by the entry's own timer.
    fn expire(&mut self, id: NotificationId) {
        self.timers.remove(&id);
        if self.remove_entry(id) {
            tracing::trace!(?id, "notification expired");
        }
    }

    fn remove_entry(&mut self, id: NotificationId) -> bool {
        match self.entries.iter().position(|e| e.notification.id() == id) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }
}

fn lock(queue: &Mutex<Queue>) -> MutexGuard<'_, Queue> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared handle to the notification queue.
///
/// Cloning yields another handle to the same queue.
#[derive(Debug, Clone)]
pub struct Manager {
    queue: Arc<Mutex<Queue>>,
    default_ttl: NotificationTtl,
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

impl Manager {
    /// Creates an empty manager using the default lifetime.
    #[must_use]
    pub fn new() -> Self {
        Self::with_default_ttl(NotificationTtl::default())
    }

    #[must_use]
    pub fn with_default_ttl(default_ttl: NotificationTtl) -> Self {
        Self {
            queue: Arc::new(Mutex::new(Queue::default())),
            default_ttl,
        }
    }

    #[must_use]
    pub fn default_ttl(&self) -> NotificationTtl {
        self.default_ttl
    }

    /// Appends a notification and schedules its removal.
    ///
    /// The lifetime starts now. Notifications without an explicit lifetime
    /// use the manager's default.
    pub fn push(&self, mut notification: Notification) -> NotificationId {
        let ttl = notification.ttl().unwrap_or(self.default_ttl);
        notification.stamp(ttl);
        let id = notification.id();
        let expires_at = notification.created_at() + ttl.as_duration();

        tracing::debug!(
            ?id,
            severity = ?notification.severity(),
            key = notification.message_key(),
            ttl_ms = ttl.as_millis(),
            "notification pushed"
        );

        // The timer is registered under the same lock as the entry, so it
        // cannot fire before its handle is recorded.
        let mut queue = lock(&self.queue);
        queue.entries.push(Entry {
            notification,
            expires_at,
        });
        if let Some(timer) = self.schedule_expiry(id, expires_at) {
            queue.timers.insert(id, timer);
        }
        id
    }

    fn schedule_expiry(&self, id: NotificationId, deadline: Instant) -> Option<AbortHandle> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(?id, "no async runtime, notification expires on tick");
            return None;
        };
        let queue = Arc::downgrade(&self.queue);
        let task = runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(queue) = queue.upgrade() {
                lock(&queue).expire(id);
            }
        });
        Some(task.abort_handle())
    }

    /// Pushes a notification of the given kind with the default lifetime.
    pub fn notify(&self, severity: Severity, message_key: impl Into<String>) -> NotificationId {
        self.push(Notification::new(severity, message_key))
    }

    /// Pushes a notification of the given kind with an explicit lifetime.
    pub fn notify_for(
        &self,
        severity: Severity,
        message_key: impl Into<String>,
        ttl: impl Into<NotificationTtl>,
    ) -> NotificationId {
        self.push(Notification::new(severity, message_key).with_ttl(ttl))
    }

    pub fn success(&self, message_key: impl Into<String>) -> NotificationId {
        self.notify(Severity::Success, message_key)
    }

    pub fn error(&self, message_key: impl Into<String>) -> NotificationId {
        self.notify(Severity::Error, message_key)
    }

    pub fn info(&self, message_key: impl Into<String>) -> NotificationId {
        self.notify(Severity::Info, message_key)
    }

    pub fn warning(&self, message_key: impl Into<String>) -> NotificationId {
        self.notify(Severity::Warning, message_key)
    }

    /// Removes a notification before it expires.
    ///
    /// Returns `true` if the notification was still present.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        lock(&self.queue).cancel(id)
    }

    /// Drops every notification whose lifetime has elapsed.
    pub fn tick(&self) {
        let now = Instant::now();
        let mut queue = lock(&self.queue);
        let expired: Vec<NotificationId> = queue
            .entries
            .iter()
            .filter(|e| e.expires_at <= now)
            .map(|e| e.notification.id())
            .collect();
        for id in expired {
            queue.cancel(id);
        }
    }

    /// Handles a notification message.
    pub fn handle_message(&self, message: &Message) {
        match message {
            Message::Dismiss(id) => {
                self.dismiss(*id);
            }
            Message::Tick => self.tick(),
        }
    }

    /// Returns the live notifications in insertion order.
    #[must_use]
    pub fn visible(&self) -> Vec<Notification> {
        let now = Instant::now();
        lock(&self.queue)
            .entries
            .iter()
            .filter(|e| e.expires_at > now)
            .map(|e| e.notification.clone())
            .collect()
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible().len()
    }

    /// Whether any notification is still stored, including expired entries
    /// that have not been swept yet.
    #[must_use]
    pub fn has_notifications(&self) -> bool {
        !lock(&self.queue).entries.is_empty()
    }

    /// Removes all notifications and cancels their timers.
    pub fn clear(&self) {
        let mut queue = lock(&self.queue);
        for (_, timer) in queue.timers.drain() {
            timer.abort();
        }
        queue.entries.clear();
    }

    #[cfg(test)]
    fn pending_timers(&self) -> usize {
        lock(&self.queue).timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    fn keys(manager: &Manager) -> Vec<String> {
        manager
            .visible()
            .iter()
            .map(|n| n.message_key().to_string())
            .collect()
    }

    #[test]
    fn new_manager_is_empty() {
        let manager = Manager::new();
        assert_eq!(manager.visible_count(), 0);
        assert!(!manager.has_notifications());
        assert_eq!(manager.default_ttl(), NotificationTtl::default());
    }

    #[tokio::test(start_paused = true)]
    async fn notifications_expire_independently() {
        let manager = Manager::new();
        manager.notify_for(Severity::Success, "Saved", Duration::from_millis(200));
        manager.notify_for(Severity::Error, "Failed", Duration::from_millis(50));

        sleep(Duration::from_millis(10)).await;
        assert_eq!(keys(&manager), ["Saved", "Failed"]);

        sleep(Duration::from_millis(50)).await;
        assert_eq!(keys(&manager), ["Saved"]);

        sleep(Duration::from_millis(150)).await;
        assert!(keys(&manager).is_empty());
        assert!(!manager.has_notifications());
    }

    #[tokio::test(start_paused = true)]
    async fn present_until_exactly_ttl() {
        let manager = Manager::new();
        manager.notify_for(Severity::Info, "ttl", Duration::from_millis(100));

        sleep(Duration::from_millis(99)).await;
        assert_eq!(manager.visible_count(), 1);

        sleep(Duration::from_millis(1)).await;
        assert_eq!(manager.visible_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn default_ttl_applies_when_unspecified() {
        let manager = Manager::new();
        manager.success("notification-card-deleted");

        sleep(Duration::from_millis(2999)).await;
        assert_eq!(manager.visible_count(), 1);
        sleep(Duration::from_millis(2)).await;
        assert_eq!(manager.visible_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_of_middle_entry_keeps_order() {
        let manager = Manager::new();
        manager.notify_for(Severity::Info, "a", Duration::from_millis(300));
        manager.notify_for(Severity::Info, "b", Duration::from_millis(100));
        manager.notify_for(Severity::Info, "c", Duration::from_millis(300));
        manager.notify_for(Severity::Info, "d", Duration::from_millis(300));

        sleep(Duration::from_millis(150)).await;
        assert_eq!(keys(&manager), ["a", "c", "d"]);
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_cancels_the_timer() {
        let manager = Manager::new();
        let id = manager.warning("dismiss-me");
        manager.info("keep-me");
        assert_eq!(manager.pending_timers(), 2);

        assert!(manager.dismiss(id));
        assert_eq!(manager.pending_timers(), 1);
        assert!(!manager.dismiss(id));
        assert_eq!(keys(&manager), ["keep-me"]);

        sleep(Duration::from_millis(3001)).await;
        assert!(!manager.has_notifications());
        assert_eq!(manager.pending_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn handle_message_dismiss() {
        let manager = Manager::new();
        let id = manager.error("test");

        manager.handle_message(&Message::Dismiss(id));
        assert_eq!(manager.visible_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn burst_is_not_capped() {
        let manager = Manager::new();
        for i in 0..100 {
            manager.info(format!("burst-{i}"));
        }
        assert_eq!(manager.visible_count(), 100);
        assert_eq!(manager.pending_timers(), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_removes_all() {
        let manager = Manager::new();
        for i in 0..5 {
            manager.success(format!("test-{i}"));
        }

        manager.clear();
        assert!(!manager.has_notifications());
        assert_eq!(manager.pending_timers(), 0);
    }

    #[test]
    fn tick_sweeps_when_no_runtime_hosts_timers() {
        let manager = Manager::new();
        manager.notify_for(Severity::Info, "short", Duration::from_millis(1));
        manager.notify_for(Severity::Info, "long", Duration::from_secs(60));
        assert_eq!(manager.pending_timers(), 0);

        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(keys(&manager), ["long"]);

        manager.tick();
        assert!(manager.has_notifications());
        assert_eq!(manager.visible_count(), 1);
    }
}
