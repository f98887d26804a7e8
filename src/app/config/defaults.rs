// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Notifications**: Toast lifetime
//! - **Accounts**: Credential rules shared by the local auth backend and forms
//! - **Uploads**: Card photo object naming

// ==========================================================================
// Notification Defaults
// ==========================================================================

/// Default lifetime of a toast notification (in milliseconds).
pub const DEFAULT_NOTIFICATION_TTL_MS: u64 = 3000;

/// Minimum toast lifetime (in milliseconds). A toast always lives for a
/// positive duration.
pub const MIN_NOTIFICATION_TTL_MS: u64 = 1;

/// Interval of the sweep that drops expired toasts while any is shown
/// (in milliseconds).
pub const TICK_INTERVAL_MS: u64 = 100;

// ==========================================================================
// Account Defaults
// ==========================================================================

/// Minimum password length accepted on registration.
pub const MIN_PASSWORD_LEN: usize = 6;

// ==========================================================================
// Upload Defaults
// ==========================================================================

/// Maximum number of characters kept from the card name in photo paths.
pub const MAX_PHOTO_NAME_CHARS: usize = 60;

/// Root prefix under which card photos are stored.
pub const PHOTO_ROOT: &str = "cardImages";
