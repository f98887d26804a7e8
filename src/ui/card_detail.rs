// SPDX-License-Identifier: MPL-2.0
//! Single card editor with save, photo replacement and delete.

use crate::application::card_form::CardContext;
use crate::application::catalog::{CardFields, CardInfo, Taxonomy};
use crate::application::port::DocumentId;
use crate::application::upload::PickedPhoto;
use crate::error::Error;
use crate::i18n::fluent::I18n;
use crate::ui::card_editor;
use crate::ui::design_tokens::{spacing, typography};
use crate::ui::format;
use crate::ui::notifications::{Manager, Notification};
use crate::ui::styles;
use iced::widget::{button, scrollable, Column, Container, Row, Text};
use iced::{alignment, Element, Length};

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub state: &'a State,
    pub busy: bool,
}

#[derive(Debug, Clone)]
pub struct State {
    pub game_id: DocumentId,
    pub version_id: DocumentId,
    pub card_id: DocumentId,
    pub card: Option<CardInfo>,
    pub editor: card_editor::State,
    pub confirm_delete: bool,
}

#[derive(Debug, Clone)]
pub enum Message {
    CardLoaded(Result<Option<CardInfo>, Error>),
    Editor(card_editor::Message),
    Save,
    /// Carries the card as stored after the update.
    SaveFinished(Result<Option<CardInfo>, Error>),
    RequestDelete,
    ConfirmDelete,
    CancelDelete,
    DeleteFinished(Result<(), Error>),
    Back,
}

#[derive(Debug, Clone)]
pub enum Event {
    None,
    AddOption {
        taxonomy: Taxonomy,
        context: CardContext,
        name: String,
    },
    PickPhoto,
    Save {
        id: DocumentId,
        context: CardContext,
        fields: CardFields,
        photo: Option<PickedPhoto>,
    },
    Delete {
        id: DocumentId,
    },
    Back,
}

impl State {
    #[must_use]
    pub fn new(game_id: DocumentId, version_id: DocumentId, card_id: DocumentId) -> Self {
        Self {
            game_id,
            version_id,
            card_id,
            card: None,
            editor: card_editor::State::default(),
            confirm_delete: false,
        }
    }

    #[must_use]
    pub fn context(&self) -> Option<CardContext> {
        self.card.as_ref().map(|card| CardContext {
            card_game_name: card.card_game_name.clone(),
            version_name: card.version_name.clone(),
        })
    }

    /// Whether the form differs from the stored card.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.card
            .as_ref()
            .is_some_and(|card| self.editor.form.is_changed(card))
    }

    fn load(&mut self, card: CardInfo) {
        let characters = std::mem::take(&mut self.editor.characters);
        let card_types = std::mem::take(&mut self.editor.card_types);
        self.editor = card_editor::State {
            characters,
            card_types,
            ..card_editor::State::from_card(&card)
        };
        self.card = Some(card);
    }

    pub fn update(&mut self, message: Message, notifications: &Manager) -> Event {
        match message {
            Message::CardLoaded(Ok(Some(card))) => {
                self.load(card);
                Event::None
            }
            Message::CardLoaded(Ok(None)) => {
                notifications.error("error-store-not-found");
                Event::Back
            }
            Message::CardLoaded(Err(err)) => {
                tracing::warn!(%err, card = %self.card_id, "card failed to load");
                notifications.error(err.i18n_key());
                Event::None
            }
            Message::Editor(message) => match self.editor.update(message, notifications) {
                card_editor::Event::None => Event::None,
                card_editor::Event::PickPhoto => Event::PickPhoto,
                card_editor::Event::AddOption { taxonomy, name } => match self.context() {
                    Some(context) => Event::AddOption {
                        taxonomy,
                        context,
                        name,
                    },
                    None => Event::None,
                },
            },
            Message::Save => {
                if !self.is_dirty() {
                    return Event::None;
                }
                let context = self.context();
                match (self.editor.validate(context.as_ref()), context) {
                    (Ok(fields), Some(context)) => Event::Save {
                        id: self.card_id.clone(),
                        context,
                        fields,
                        photo: self.editor.photo.as_ref().map(|p| p.photo.clone()),
                    },
                    (Err(err), _) => {
                        notifications.error(err.i18n_key());
                        Event::None
                    }
                    (Ok(_), None) => Event::None,
                }
            }
            Message::SaveFinished(Ok(Some(card))) => {
                let name = card.card_name.clone();
                self.load(card);
                notifications.push(
                    Notification::success("notification-card-saved").with_arg("name", name),
                );
                Event::None
            }
            Message::SaveFinished(Ok(None)) => {
                notifications.error("error-store-not-found");
                Event::Back
            }
            Message::SaveFinished(Err(err)) => {
                notifications.error(err.i18n_key());
                Event::None
            }
            Message::RequestDelete => {
                self.confirm_delete = true;
                Event::None
            }
            Message::CancelDelete => {
                self.confirm_delete = false;
                Event::None
            }
            Message::ConfirmDelete => {
                if !std::mem::take(&mut self.confirm_delete) {
                    return Event::None;
                }
                Event::Delete {
                    id: self.card_id.clone(),
                }
            }
            Message::DeleteFinished(Ok(())) => {
                notifications.success("notification-card-deleted");
                Event::Back
            }
            Message::DeleteFinished(Err(err)) => {
                notifications.error(err.i18n_key());
                Event::None
            }
            Message::Back => Event::Back,
        }
    }
}

fn delete_controls<'a>(i18n: &I18n, state: &State, busy: bool) -> Element<'a, Message> {
    if state.confirm_delete {
        Row::new()
            .spacing(spacing::XS)
            .align_y(alignment::Vertical::Center)
            .push(Text::new(i18n.tr("confirm-delete-question")).size(typography::BODY))
            .push(
                button(Text::new(i18n.tr("action-delete")))
                    .on_press_maybe((!busy).then_some(Message::ConfirmDelete))
                    .padding(spacing::XS)
                    .style(styles::button::danger),
            )
            .push(
                button(Text::new(i18n.tr("action-cancel")))
                    .on_press(Message::CancelDelete)
                    .padding(spacing::XS)
                    .style(styles::button::ghost),
            )
            .into()
    } else {
        button(Text::new(i18n.tr("action-delete")))
            .on_press_maybe((!busy && state.card.is_some()).then_some(Message::RequestDelete))
            .padding(spacing::XS)
            .style(styles::button::danger)
            .into()
    }
}

#[allow(clippy::needless_pass_by_value)]
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let i18n = ctx.i18n;
    let state = ctx.state;

    let title = state.card.as_ref().map_or_else(
        || i18n.tr("list-loading"),
        |card| format!("{} / {}", card.card_game_name, card.version_name),
    );

    let header = Row::new()
        .spacing(spacing::SM)
        .align_y(alignment::Vertical::Center)
        .push(
            button(Text::new(i18n.tr("action-back")))
                .on_press(Message::Back)
                .style(styles::button::ghost),
        )
        .push(Text::new(title).size(typography::TITLE_MD));

    let Some(card) = &state.card else {
        return Container::new(
            Column::new()
                .spacing(spacing::MD)
                .push(header)
                .push(Text::new(i18n.tr("list-loading"))),
        )
        .padding(spacing::LG)
        .into();
    };

    let save = button(Text::new(i18n.tr("action-save")))
        .on_press_maybe((!ctx.busy && state.is_dirty()).then_some(Message::Save))
        .padding(spacing::XS)
        .style(styles::button::primary);

    let mut meta = Column::new().spacing(spacing::XXS);
    if let Some(url) = card.card_photo.as_deref() {
        meta = meta.push(
            Text::new(i18n.tr_with_args("card-photo-url", &[("url", url)]))
                .size(typography::CAPTION),
        );
    }
    let updated = format::timestamp(card.updated_at);
    if !updated.is_empty() {
        meta = meta.push(
            Text::new(i18n.tr_with_args("card-updated-at", &[("at", updated.as_str())]))
                .size(typography::CAPTION),
        );
    }

    let content = Column::new()
        .spacing(spacing::MD)
        .push(header)
        .push(card_editor::view(i18n, &state.editor, card.card_photo.as_deref(), ctx.busy).map(Message::Editor))
        .push(meta)
        .push(
            Row::new()
                .spacing(spacing::SM)
                .align_y(alignment::Vertical::Center)
                .push(save)
                .push(iced::widget::Space::new().width(Length::Fill))
                .push(delete_controls(i18n, state, ctx.busy)),
        );

    Container::new(scrollable(content.padding(spacing::LG)).height(Length::Fill))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
