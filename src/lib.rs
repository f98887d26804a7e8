// SPDX-License-Identifier: MPL-2.0
//! `kaitori_admin` is a desktop admin console for a trading-card buy-price
//! list, built with the Iced GUI framework.
//!
//! Staff sign in, then maintain card games, their versions and the cards of
//! each version, including buy prices, wanted quantities and card photos.
//! The catalog lives in a document store behind the ports in
//! [`application::port`]; the bundled adapters keep it on local disk.

pub mod app;
pub mod application;
pub mod error;
pub mod i18n;
pub mod infrastructure;
pub mod logging;
pub mod ui;
