// SPDX-License-Identifier: MPL-2.0
//! UI state shared across screens.

pub mod busy;
pub mod notification_ttl;

pub use busy::{BusyGuard, BusyTracker};
pub use notification_ttl::NotificationTtl;
