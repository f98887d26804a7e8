// SPDX-License-Identifier: MPL-2.0
//! Card form state, validation and change detection.
//!
//! The form keeps raw text as typed. [`CardForm::validate`] turns it into
//! [`CardFields`] ready for the catalog, and [`CardForm::is_changed`]
//! compares it with the stored card so the save button is only enabled when
//! something differs.

use crate::application::catalog::{CardFields, CardInfo};
use thiserror::Error;

/// Validation failures of the card and catalog forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("card game and version are not loaded yet")]
    MissingContext,

    #[error("card name is required")]
    CardNameRequired,

    #[error("store price must be a non-negative integer")]
    InvalidStorePrice,

    #[error("minimum price must be a non-negative integer")]
    InvalidMinPrice,

    #[error("wanted quantity must be a non-negative integer")]
    InvalidWantedQty,

    #[error("name is required")]
    NameRequired,

    #[error("passwords do not match")]
    PasswordMismatch,
}

impl FormError {
    #[must_use]
    pub fn i18n_key(self) -> &'static str {
        match self {
            FormError::MissingContext => "error-form-missing-context",
            FormError::CardNameRequired => "error-form-card-name-required",
            FormError::InvalidStorePrice => "error-form-store-price",
            FormError::InvalidMinPrice => "error-form-min-price",
            FormError::InvalidWantedQty => "error-form-wanted-qty",
            FormError::NameRequired => "error-form-name-required",
            FormError::PasswordMismatch => "error-form-password-mismatch",
        }
    }
}

/// Card game and version a card belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardContext {
    pub card_game_name: String,
    pub version_name: String,
}

impl CardContext {
    fn is_loaded(&self) -> bool {
        !self.card_game_name.trim().is_empty() && !self.version_name.trim().is_empty()
    }
}

/// Editable text of a card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardForm {
    pub card_name: String,
    pub card_character: String,
    pub card_type: String,
    pub store_price: String,
    pub min_price: String,
    pub wanted_qty: String,
    /// Whether a new photo was picked and awaits upload.
    pub photo_picked: bool,
}

impl CardForm {
    /// Prefills the form from a stored card.
    #[must_use]
    pub fn from_card(card: &CardInfo) -> Self {
        Self {
            card_name: card.card_name.clone(),
            card_character: card.card_character.clone().unwrap_or_default(),
            card_type: card.card_type.clone().unwrap_or_default(),
            store_price: amount_text(card.store_price),
            min_price: amount_text(card.min_price),
            wanted_qty: amount_text(card.wanted_qty),
            photo_picked: false,
        }
    }

    /// Validates the form in `context`.
    ///
    /// The returned fields never carry a photo URL; it is set after upload.
    ///
    /// # Errors
    ///
    /// Returns the first failing check, in field order.
    pub fn validate(&self, context: Option<&CardContext>) -> Result<CardFields, FormError> {
        if !context.is_some_and(CardContext::is_loaded) {
            return Err(FormError::MissingContext);
        }
        let card_name = self.card_name.trim();
        if card_name.is_empty() {
            return Err(FormError::CardNameRequired);
        }
        let store_price = parse_amount(&self.store_price).ok_or(FormError::InvalidStorePrice)?;
        let min_price = parse_amount(&self.min_price).ok_or(FormError::InvalidMinPrice)?;
        let wanted_qty = parse_amount(&self.wanted_qty).ok_or(FormError::InvalidWantedQty)?;

        Ok(CardFields {
            card_name: card_name.to_string(),
            card_photo: None,
            card_character: non_blank(&self.card_character),
            card_type: non_blank(&self.card_type),
            store_price,
            min_price,
            wanted_qty,
        })
    }

    /// Whether the form differs from `original`.
    ///
    /// Amounts compare by value when they parse, so `"0500"` equals a stored
    /// `500`. A picked photo always counts as a change.
    #[must_use]
    pub fn is_changed(&self, original: &CardInfo) -> bool {
        self.photo_picked
            || self.card_name != original.card_name
            || self.card_character != original.card_character.clone().unwrap_or_default()
            || self.card_type != original.card_type.clone().unwrap_or_default()
            || amount_changed(&self.store_price, original.store_price)
            || amount_changed(&self.min_price, original.min_price)
            || amount_changed(&self.wanted_qty, original.wanted_qty)
    }
}

/// Parses a price or quantity field.
///
/// Returns `Some(None)` for blank input, `Some(Some(n))` for a non-negative
/// integer and `None` for anything else.
#[must_use]
pub fn parse_amount(raw: &str) -> Option<Option<i64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(None);
    }
    match trimmed.parse::<i64>() {
        Ok(value) if value >= 0 => Some(Some(value)),
        _ => None,
    }
}

fn amount_text(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn amount_changed(raw: &str, stored: Option<i64>) -> bool {
    match parse_amount(raw) {
        Some(parsed) => parsed != stored,
        None => true,
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
