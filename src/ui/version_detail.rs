// SPDX-License-Identifier: MPL-2.0
//! One version: its cards ordered by buy price, and the add-card panel.

use crate::application::card_form::CardContext;
use crate::application::catalog::{CardFields, CardInfo, Taxonomy, Version};
use crate::application::port::DocumentId;
use crate::application::upload::PickedPhoto;
use crate::error::Error;
use crate::i18n::fluent::I18n;
use crate::ui::card_editor;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::format;
use crate::ui::notifications::{Manager, Notification};
use crate::ui::styles;
use crate::ui::widgets::card_photo;
use iced::widget::{button, rule, scrollable, Column, Container, Row, Text};
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
    pub version: Option<Version>,
    pub cards: Option<Vec<CardInfo>>,
    pub editor: card_editor::State,
    pub add_form_open: bool,
}

#[derive(Debug, Clone)]
pub enum Message {
    VersionLoaded(Result<Option<Version>, Error>),
    CardsLoaded(Result<Vec<CardInfo>, Error>),
    ToggleAddForm,
    Editor(card_editor::Message),
    SubmitCard,
    CardAdded(Result<DocumentId, Error>),
    OpenCard(DocumentId),
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
    AddCard {
        context: CardContext,
        fields: CardFields,
        photo: Option<PickedPhoto>,
    },
    OpenCard(DocumentId),
    Back,
}

impl State {
    #[must_use]
    pub fn new(game_id: DocumentId, version_id: DocumentId) -> Self {
        Self {
            game_id,
            version_id,
            version: None,
            cards: None,
            editor: card_editor::State::default(),
            add_form_open: false,
        }
    }

    /// Game and version names the feeds are keyed by, once loaded.
    #[must_use]
    pub fn context(&self) -> Option<CardContext> {
        self.version.as_ref().map(|version| CardContext {
            card_game_name: version.card_game_name.clone(),
            version_name: version.version_name.clone(),
        })
    }

    pub fn update(&mut self, message: Message, notifications: &Manager) -> Event {
        match message {
            Message::VersionLoaded(Ok(Some(version))) => {
                self.version = Some(version);
                Event::None
            }
            Message::VersionLoaded(Ok(None)) => {
                notifications.error("error-store-not-found");
                Event::Back
            }
            Message::VersionLoaded(Err(err)) | Message::CardsLoaded(Err(err)) => {
                tracing::warn!(%err, version = %self.version_id, "version detail failed to load");
                notifications.error(err.i18n_key());
                Event::None
            }
            Message::CardsLoaded(Ok(cards)) => {
                self.cards = Some(cards);
                Event::None
            }
            Message::ToggleAddForm => {
                self.add_form_open = !self.add_form_open;
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
            Message::SubmitCard => {
                let context = self.context();
                match self.editor.validate(context.as_ref()) {
                    Ok(fields) => match context {
                        Some(context) => Event::AddCard {
                            context,
                            fields,
                            photo: self.editor.photo.as_ref().map(|p| p.photo.clone()),
                        },
                        None => Event::None,
                    },
                    Err(err) => {
                        notifications.error(err.i18n_key());
                        Event::None
                    }
                }
            }
            Message::CardAdded(Ok(_)) => {
                let name = self.editor.form.card_name.trim().to_string();
                self.editor.reset();
                notifications.push(
                    Notification::success("notification-card-added").with_arg("name", name),
                );
                Event::None
            }
            Message::CardAdded(Err(err)) => {
                notifications.error(err.i18n_key());
                Event::None
            }
            Message::OpenCard(id) => Event::OpenCard(id),
            Message::Back => Event::Back,
        }
    }
}

fn card_tile<'a>(i18n: &I18n, card: &'a CardInfo) -> Element<'a, Message> {
    let source = card
        .card_photo
        .as_deref()
        .map_or(card_photo::Source::None, card_photo::Source::Stored);

    let price_line = |key: &str, value: String| {
        Row::new()
            .push(Text::new(i18n.tr(key)).size(typography::CAPTION))
            .push(iced::widget::Space::new().width(Length::Fill))
            .push(Text::new(value).size(typography::BODY))
    };

    let mut tags = Row::new().spacing(spacing::XXS);
    for tag in [card.card_character.as_deref(), card.card_type.as_deref()]
        .into_iter()
        .flatten()
    {
        tags = tags.push(Text::new(tag.to_string()).size(typography::CAPTION));
    }

    let content = Column::new()
        .spacing(spacing::XXS)
        .push(card_photo::view(
            source,
            i18n.tr("card-photo-none"),
            sizing::CARD_TILE_WIDTH - 2.0 * spacing::SM,
            sizing::PHOTO_THUMB_HEIGHT,
        ))
        .push(Text::new(card.card_name.as_str()).size(typography::BODY_LG))
        .push(tags)
        .push(price_line("card-store-price", format::yen(card.store_price)))
        .push(price_line("card-min-price", format::yen(card.min_price)))
        .push(price_line("card-wanted-qty", format::quantity(card.wanted_qty)));

    button(content)
        .on_press(Message::OpenCard(card.id.clone()))
        .padding(spacing::SM)
        .width(Length::Fixed(sizing::CARD_TILE_WIDTH))
        .style(styles::button::tile)
        .into()
}

#[allow(clippy::needless_pass_by_value)]
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let i18n = ctx.i18n;
    let state = ctx.state;

    let title = state.version.as_ref().map_or_else(
        || i18n.tr("list-loading"),
        |version| format!("{} / {}", version.card_game_name, version.version_name),
    );

    let toggle_key = if state.add_form_open {
        "cards-hide-add-form"
    } else {
        "cards-show-add-form"
    };
    let header = Row::new()
        .spacing(spacing::SM)
        .align_y(alignment::Vertical::Center)
        .push(
            button(Text::new(i18n.tr("action-back")))
                .on_press(Message::Back)
                .style(styles::button::ghost),
        )
        .push(Text::new(title).size(typography::TITLE_MD))
        .push(iced::widget::Space::new().width(Length::Fill))
        .push(
            button(Text::new(i18n.tr(toggle_key)))
                .on_press(Message::ToggleAddForm)
                .padding(spacing::XS)
                .style(styles::button::primary),
        );

    let mut content = Column::new().spacing(spacing::MD).push(header);

    if state.add_form_open {
        let submit = button(Text::new(i18n.tr("cards-add")))
            .on_press_maybe((!ctx.busy && state.version.is_some()).then_some(Message::SubmitCard))
            .padding(spacing::XS)
            .style(styles::button::primary);
        let panel = Column::new()
            .spacing(spacing::SM)
            .push(Text::new(i18n.tr("cards-add-title")).size(typography::TITLE_SM))
            .push(card_editor::view(i18n, &state.editor, None, ctx.busy).map(Message::Editor))
            .push(submit);
        content = content.push(
            Container::new(panel)
                .padding(spacing::MD)
                .width(Length::Fill)
                .style(styles::container::panel),
        );
    }

    let body: Element<'_, Message> = match &state.cards {
        None => Text::new(i18n.tr("list-loading")).into(),
        Some(cards) if cards.is_empty() => Text::new(i18n.tr("cards-empty")).into(),
        Some(cards) => Row::with_children(cards.iter().map(|card| card_tile(i18n, card)))
            .spacing(spacing::SM)
            .wrap()
            .vertical_spacing(spacing::SM)
            .into(),
    };

    content = content.push(rule::horizontal(1)).push(body);

    Container::new(scrollable(content.padding(spacing::LG)).height(Length::Fill))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
