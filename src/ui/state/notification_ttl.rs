// SPDX-License-Identifier: MPL-2.0
//! Toast lifetime domain type.

use crate::app::config::{DEFAULT_NOTIFICATION_TTL_MS, MIN_NOTIFICATION_TTL_MS};
use std::time::Duration;

/// Lifetime of a toast notification in milliseconds.
///
/// This newtype guarantees a positive lifetime, so every notification
/// eventually expires.
///
/// # Example
///
/// ```
/// use kaitori_admin::ui::state::NotificationTtl;
///
/// let ttl = NotificationTtl::from_millis(200);
/// assert_eq!(ttl.as_millis(), 200);
///
/// // Zero is clamped to the minimum
/// assert_eq!(NotificationTtl::from_millis(0).as_millis(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NotificationTtl(u64);

impl NotificationTtl {
    /// Creates a lifetime, clamping to the minimum.
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self(millis.max(MIN_NOTIFICATION_TTL_MS))
    }

    #[must_use]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for NotificationTtl {
    fn default() -> Self {
        Self(DEFAULT_NOTIFICATION_TTL_MS)
    }
}

impl From<Duration> for NotificationTtl {
    fn from(duration: Duration) -> Self {
        Self::from_millis(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_three_seconds() {
        assert_eq!(NotificationTtl::default().as_millis(), 3000);
    }

    #[test]
    fn zero_is_clamped() {
        assert_eq!(
            NotificationTtl::from_millis(0).as_millis(),
            MIN_NOTIFICATION_TTL_MS
        );
    }

    #[test]
    fn converts_from_duration() {
        let ttl = NotificationTtl::from(Duration::from_millis(250));
        assert_eq!(ttl.as_duration(), Duration::from_millis(250));
    }
}
