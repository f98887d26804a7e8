// SPDX-License-Identifier: MPL-2.0
//! Toast notification system for user feedback.
//!
//! Notifications are short, typed, self-expiring messages. Screens report
//! the outcome of backend actions through them instead of inline text.
//!
//! # Components
//!
//! - [`notification`] - `Notification` struct with severity levels
//! - [`manager`] - `Manager`, the ordered queue with per-entry expiry timers
//! - [`toast`] - Toast widget rendering the queue
//!
//! # Usage
//!
//! ```ignore
//! use crate::ui::notifications::{Manager, Toast};
//!
//! let notifications = Manager::new();
//! notifications.success("notification-card-deleted");
//!
//! // In the view function, render toasts on top of the screen
//! let toast_overlay = Toast::view_overlay(&notifications, &i18n).map(Message::Notification);
//! ```
//!
//! # Design Considerations
//!
//! - Every notification lives for its own lifetime (3s by default), errors included
//! - No cap on visible toasts; insertion order is display order
//! - Position: top-right corner

mod manager;
mod notification;
mod toast;

pub use manager::{Manager, Message as NotificationMessage};
pub use notification::{Notification, NotificationId, Severity};
pub use toast::Toast;
