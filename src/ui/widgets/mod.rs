// SPDX-License-Identifier: MPL-2.0
pub mod animated_spinner;
pub mod busy_overlay;
pub mod card_photo;

pub use animated_spinner::AnimatedSpinner;
