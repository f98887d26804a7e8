// SPDX-License-Identifier: MPL-2.0
//! Shared styles for all UI components.

pub mod button;
pub mod container;
