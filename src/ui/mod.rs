// SPDX-License-Identifier: MPL-2.0
//! User interface components and state management.
//!
//! This module organizes all UI-related code following a component-based architecture
//! with the Elm-style "state down, messages up" pattern. Screens return events
//! to the application, which performs the backend calls.
//!
//! # Screens
//!
//! - [`login`] / [`register`] - Sign-in and account creation
//! - [`dashboard`] - Landing page after sign-in
//! - [`card_games`] - Card game list with inline add, rename and delete
//! - [`card_game_detail`] - Versions of one card game
//! - [`version_detail`] - Cards of one version, with the add form
//! - [`card_detail`] - Edit or delete one card
//!
//! # Shared Infrastructure
//!
//! - [`card_editor`] - Card form shared by the add and edit screens
//! - [`sidebar`] - Navigation shown beside every protected screen
//! - [`state`] - Busy tracking and notification lifetimes
//! - [`widgets`] - Spinner, busy overlay and card photo
//! - [`styles`] - Centralized styling (buttons, containers)
//! - [`design_tokens`] - Design system constants (colors, spacing, sizing)
//! - [`theming`] - Light/Dark/System theme mode management
//! - [`notifications`] - Toast notification system for user feedback
//! - [`format`] - Display formatting for prices and timestamps

pub mod card_detail;
pub mod card_editor;
pub mod card_game_detail;
pub mod card_games;
pub mod dashboard;
pub mod design_tokens;
pub mod format;
pub mod login;
pub mod notifications;
pub mod register;
pub mod sidebar;
pub mod state;
pub mod styles;
pub mod theming;
pub mod version_detail;
pub mod widgets;
