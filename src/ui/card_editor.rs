// SPDX-License-Identifier: MPL-2.0
//! Card form shared by the add-card panel and the card detail screen.
//!
//! The pickers list the characters and card types of the current version.
//! Their last entry switches to an inline text field that adds a new option
//! and selects it once stored.

use crate::application::card_form::{CardContext, CardForm, FormError};
use crate::application::catalog::{CardFields, CardInfo, Taxonomy, TaxonomyOption};
use crate::application::upload::PickedPhoto;
use crate::error::Error;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::notifications::Manager;
use crate::ui::styles;
use crate::ui::widgets::card_photo;
use iced::widget::image::Handle;
use iced::widget::{button, pick_list, text_input, Column, Row, Text};
use iced::{alignment, Element, Length};
use std::fmt;

/// A picker entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    label: String,
    kind: ChoiceKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ChoiceKind {
    Unset,
    Existing(String),
    AddNew,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// A photo picked from disk, with its decoded preview handle.
#[derive(Debug, Clone)]
pub struct PendingPhoto {
    pub photo: PickedPhoto,
    pub preview: Handle,
}

impl PendingPhoto {
    #[must_use]
    pub fn new(photo: PickedPhoto) -> Self {
        let preview = Handle::from_bytes(photo.bytes.clone());
        Self { photo, preview }
    }
}

#[derive(Debug, Clone, Default)]
pub struct State {
    pub form: CardForm,
    pub characters: Vec<TaxonomyOption>,
    pub card_types: Vec<TaxonomyOption>,
    /// Draft of a new character while the inline field is open.
    pub new_character: Option<String>,
    pub new_card_type: Option<String>,
    pub photo: Option<PendingPhoto>,
}

#[derive(Debug, Clone)]
pub enum Message {
    CardNameChanged(String),
    StorePriceChanged(String),
    MinPriceChanged(String),
    WantedQtyChanged(String),
    OptionsLoaded(Taxonomy, Result<Vec<TaxonomyOption>, Error>),
    Picked(Taxonomy, Choice),
    NewOptionChanged(Taxonomy, String),
    CommitNewOption(Taxonomy),
    CancelNewOption(Taxonomy),
    OptionAdded(Taxonomy, Result<TaxonomyOption, Error>),
    PickPhoto,
    PhotoPicked(Result<Option<PickedPhoto>, Error>),
    ClearPhoto,
}

#[derive(Debug, Clone)]
pub enum Event {
    None,
    AddOption { taxonomy: Taxonomy, name: String },
    PickPhoto,
}

impl State {
    /// Form prefilled from a stored card.
    #[must_use]
    pub fn from_card(card: &CardInfo) -> Self {
        Self {
            form: CardForm::from_card(card),
            ..Self::default()
        }
    }

    /// Clears the fields after a successful add. Loaded options are kept.
    pub fn reset(&mut self) {
        self.form = CardForm::default();
        self.new_character = None;
        self.new_card_type = None;
        self.photo = None;
    }

    /// Validates the form for `context`.
    ///
    /// # Errors
    ///
    /// Returns the first failing check.
    pub fn validate(&self, context: Option<&CardContext>) -> Result<CardFields, FormError> {
        self.form.validate(context)
    }

    fn draft_mut(&mut self, taxonomy: Taxonomy) -> &mut Option<String> {
        match taxonomy {
            Taxonomy::Character => &mut self.new_character,
            Taxonomy::CardType => &mut self.new_card_type,
        }
    }

    fn selection_mut(&mut self, taxonomy: Taxonomy) -> &mut String {
        match taxonomy {
            Taxonomy::Character => &mut self.form.card_character,
            Taxonomy::CardType => &mut self.form.card_type,
        }
    }

    fn options_mut(&mut self, taxonomy: Taxonomy) -> &mut Vec<TaxonomyOption> {
        match taxonomy {
            Taxonomy::Character => &mut self.characters,
            Taxonomy::CardType => &mut self.card_types,
        }
    }

    pub fn update(&mut self, message: Message, notifications: &Manager) -> Event {
        match message {
            Message::CardNameChanged(value) => self.form.card_name = value,
            Message::StorePriceChanged(value) => self.form.store_price = value,
            Message::MinPriceChanged(value) => self.form.min_price = value,
            Message::WantedQtyChanged(value) => self.form.wanted_qty = value,
            Message::OptionsLoaded(taxonomy, Ok(options)) => {
                *self.options_mut(taxonomy) = options;
            }
            Message::OptionsLoaded(taxonomy, Err(err)) => {
                tracing::warn!(%err, ?taxonomy, "taxonomy options failed to load");
                notifications.error(err.i18n_key());
            }
            Message::Picked(taxonomy, choice) => match choice.kind {
                ChoiceKind::Unset => {
                    self.selection_mut(taxonomy).clear();
                    *self.draft_mut(taxonomy) = None;
                }
                ChoiceKind::Existing(name) => {
                    *self.selection_mut(taxonomy) = name;
                    *self.draft_mut(taxonomy) = None;
                }
                ChoiceKind::AddNew => {
                    *self.draft_mut(taxonomy) = Some(String::new());
                }
            },
            Message::NewOptionChanged(taxonomy, value) => {
                if let Some(draft) = self.draft_mut(taxonomy) {
                    *draft = value;
                }
            }
            Message::CommitNewOption(taxonomy) => {
                let Some(draft) = self.draft_mut(taxonomy).as_deref() else {
                    return Event::None;
                };
                let name = draft.trim().to_string();
                if name.is_empty() {
                    notifications.error(FormError::NameRequired.i18n_key());
                    return Event::None;
                }
                return Event::AddOption { taxonomy, name };
            }
            Message::CancelNewOption(taxonomy) => {
                *self.draft_mut(taxonomy) = None;
            }
            Message::OptionAdded(taxonomy, Ok(option)) => {
                *self.draft_mut(taxonomy) = None;
                *self.selection_mut(taxonomy) = option.name.clone();
                let options = self.options_mut(taxonomy);
                if !options.iter().any(|existing| existing.id == option.id) {
                    options.push(option);
                }
                notifications.success(match taxonomy {
                    Taxonomy::Character => "notification-character-added",
                    Taxonomy::CardType => "notification-card-type-added",
                });
            }
            Message::OptionAdded(_, Err(err)) => {
                notifications.error(err.i18n_key());
            }
            Message::PickPhoto => return Event::PickPhoto,
            Message::PhotoPicked(Ok(Some(photo))) => {
                self.photo = Some(PendingPhoto::new(photo));
                self.form.photo_picked = true;
            }
            Message::PhotoPicked(Ok(None)) => {}
            Message::PhotoPicked(Err(err)) => {
                notifications.error(err.i18n_key());
            }
            Message::ClearPhoto => {
                self.photo = None;
                self.form.photo_picked = false;
            }
        }
        Event::None
    }
}

fn choices(i18n: &I18n, options: &[TaxonomyOption]) -> Vec<Choice> {
    let mut choices = Vec::with_capacity(options.len() + 2);
    choices.push(Choice {
        label: i18n.tr("card-form-unset"),
        kind: ChoiceKind::Unset,
    });
    choices.extend(options.iter().map(|option| Choice {
        label: option.name.clone(),
        kind: ChoiceKind::Existing(option.name.clone()),
    }));
    choices.push(Choice {
        label: i18n.tr("card-form-add-new"),
        kind: ChoiceKind::AddNew,
    });
    choices
}

fn picker<'a>(
    i18n: &I18n,
    taxonomy: Taxonomy,
    label_key: &str,
    options: &[TaxonomyOption],
    selected: &str,
    draft: Option<&'a str>,
    busy: bool,
) -> Element<'a, Message> {
    let label = Text::new(i18n.tr(label_key)).size(typography::BODY);

    if let Some(draft) = draft {
        let commit = (!busy).then_some(Message::CommitNewOption(taxonomy));
        let field = Row::new()
            .spacing(spacing::XXS)
            .align_y(alignment::Vertical::Center)
            .push(
                text_input(&i18n.tr("card-form-new-option-placeholder"), draft)
                    .on_input(move |value| Message::NewOptionChanged(taxonomy, value))
                    .on_submit_maybe(commit.clone())
                    .padding(spacing::XXS)
                    .width(Length::Fill),
            )
            .push(
                button(Text::new(i18n.tr("action-add")).size(typography::BODY_SM))
                    .on_press_maybe(commit)
                    .style(styles::button::primary),
            )
            .push(
                button(Text::new(i18n.tr("action-cancel")).size(typography::BODY_SM))
                    .on_press(Message::CancelNewOption(taxonomy))
                    .style(styles::button::ghost),
            );
        return Column::new().spacing(spacing::XXS).push(label).push(field).into();
    }

    let choices = choices(i18n, options);
    let current = choices
        .iter()
        .find(|choice| matches!(&choice.kind, ChoiceKind::Existing(name) if name == selected))
        .cloned()
        .or_else(|| {
            (!selected.is_empty()).then(|| Choice {
                label: selected.to_string(),
                kind: ChoiceKind::Existing(selected.to_string()),
            })
        });

    Column::new()
        .spacing(spacing::XXS)
        .push(label)
        .push(
            pick_list(choices, current, move |choice| Message::Picked(taxonomy, choice))
                .placeholder(i18n.tr("card-form-unset"))
                .padding(spacing::XS)
                .width(Length::Fill),
        )
        .into()
}

fn labeled_input<'a>(
    label: String,
    placeholder: String,
    value: &'a str,
    on_input: fn(String) -> Message,
) -> Element<'a, Message> {
    Column::new()
        .spacing(spacing::XXS)
        .push(Text::new(label).size(typography::BODY))
        .push(
            text_input(&placeholder, value)
                .on_input(on_input)
                .padding(spacing::XS),
        )
        .into()
}

/// Renders the form fields. `stored_photo` is the URL of the current photo,
/// shown until another one is picked.
pub fn view<'a>(
    i18n: &I18n,
    state: &'a State,
    stored_photo: Option<&'a str>,
    busy: bool,
) -> Element<'a, Message> {
    let source = match (&state.photo, stored_photo) {
        (Some(pending), _) => card_photo::Source::Picked(&pending.preview),
        (None, Some(url)) => card_photo::Source::Stored(url),
        (None, None) => card_photo::Source::None,
    };

    let mut photo_actions = Row::new().spacing(spacing::XS).push(
        button(Text::new(i18n.tr("card-form-pick-photo")).size(typography::BODY_SM))
            .on_press_maybe((!busy).then_some(Message::PickPhoto))
            .style(styles::button::unselected),
    );
    if state.photo.is_some() {
        photo_actions = photo_actions.push(
            button(Text::new(i18n.tr("card-form-clear-photo")).size(typography::BODY_SM))
                .on_press(Message::ClearPhoto)
                .style(styles::button::ghost),
        );
    }

    let photo_column = Column::new()
        .spacing(spacing::XS)
        .push(card_photo::view(
            source,
            i18n.tr("card-photo-none"),
            sizing::PHOTO_PREVIEW_WIDTH,
            sizing::PHOTO_PREVIEW_HEIGHT,
        ))
        .push(photo_actions);

    let fields = Column::new()
        .spacing(spacing::SM)
        .width(Length::Fill)
        .push(labeled_input(
            i18n.tr("card-form-name"),
            i18n.tr("card-form-name-placeholder"),
            &state.form.card_name,
            Message::CardNameChanged,
        ))
        .push(picker(
            i18n,
            Taxonomy::Character,
            "card-form-character",
            &state.characters,
            &state.form.card_character,
            state.new_character.as_deref(),
            busy,
        ))
        .push(picker(
            i18n,
            Taxonomy::CardType,
            "card-form-card-type",
            &state.card_types,
            &state.form.card_type,
            state.new_card_type.as_deref(),
            busy,
        ))
        .push(labeled_input(
            i18n.tr("card-form-store-price"),
            i18n.tr("card-form-amount-placeholder"),
            &state.form.store_price,
            Message::StorePriceChanged,
        ))
        .push(labeled_input(
            i18n.tr("card-form-min-price"),
            i18n.tr("card-form-amount-placeholder"),
            &state.form.min_price,
            Message::MinPriceChanged,
        ))
        .push(labeled_input(
            i18n.tr("card-form-wanted-qty"),
            i18n.tr("card-form-amount-placeholder"),
            &state.form.wanted_qty,
            Message::WantedQtyChanged,
        ));

    Row::new()
        .spacing(spacing::LG)
        .push(photo_column)
        .push(fields)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::DocumentId;
    use std::path::PathBuf;

    fn option(id: &str, name: &str) -> TaxonomyOption {
        TaxonomyOption {
            id: DocumentId::new(id),
            name: name.to_string(),
        }
    }

    fn add_new() -> Choice {
        Choice {
            label: "+".into(),
            kind: ChoiceKind::AddNew,
        }
    }

    #[test]
    fn add_new_entry_opens_inline_field_without_touching_selection() {
        let notifications = Manager::new();
        let mut state = State::default();
        state.form.card_character = "ピカチュウ".into();
        state.update(Message::Picked(Taxonomy::Character, add_new()), &notifications);
        assert_eq!(state.new_character.as_deref(), Some(""));
        assert_eq!(state.form.card_character, "ピカチュウ");
    }

    #[test]
    fn committing_new_option_requests_add() {
        let notifications = Manager::new();
        let mut state = State {
            new_card_type: Some(" SR ".into()),
            ..State::default()
        };
        match state.update(Message::CommitNewOption(Taxonomy::CardType), &notifications) {
            Event::AddOption { taxonomy, name } => {
                assert_eq!(taxonomy, Taxonomy::CardType);
                assert_eq!(name, "SR");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn added_option_is_selected_once() {
        let notifications = Manager::new();
        let mut state = State {
            characters: vec![option("c1", "イーブイ")],
            new_character: Some("ミュウ".into()),
            ..State::default()
        };
        let added = option("c2", "ミュウ");
        state.update(
            Message::OptionAdded(Taxonomy::Character, Ok(added.clone())),
            &notifications,
        );
        // The live feed may deliver the same option before the reply.
        state.update(
            Message::OptionAdded(Taxonomy::Character, Ok(added)),
            &notifications,
        );
        assert_eq!(state.form.card_character, "ミュウ");
        assert!(state.new_character.is_none());
        assert_eq!(state.characters.len(), 2);
    }

    #[test]
    fn unset_choice_clears_selection() {
        let notifications = Manager::new();
        let mut state = State::default();
        state.form.card_type = "RR".into();
        let unset = Choice {
            label: "-".into(),
            kind: ChoiceKind::Unset,
        };
        state.update(Message::Picked(Taxonomy::CardType, unset), &notifications);
        assert!(state.form.card_type.is_empty());
    }

    #[test]
    fn picked_photo_marks_form_changed_until_cleared() {
        let notifications = Manager::new();
        let mut state = State::default();
        let photo = PickedPhoto {
            path: PathBuf::from("/tmp/card.jpg"),
            bytes: vec![0xFF, 0xD8],
        };
        state.update(Message::PhotoPicked(Ok(Some(photo))), &notifications);
        assert!(state.form.photo_picked);
        assert!(state.photo.is_some());

        state.update(Message::ClearPhoto, &notifications);
        assert!(!state.form.photo_picked);
        assert!(state.photo.is_none());
    }

    #[test]
    fn cancelled_dialog_keeps_previous_photo_state() {
        let notifications = Manager::new();
        let mut state = State::default();
        state.update(Message::PhotoPicked(Ok(None)), &notifications);
        assert!(!state.form.photo_picked);
        assert_eq!(notifications.visible_count(), 0);
    }
}
