// SPDX-License-Identifier: MPL-2.0
//! One card game: its versions and a form to add another.

use crate::application::card_form::FormError;
use crate::application::catalog::{CardGame, Version};
use crate::application::port::DocumentId;
use crate::error::Error;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::format;
use crate::ui::notifications::Manager;
use crate::ui::styles;
use iced::widget::{button, scrollable, text_input, Column, Container, Row, Text};
use iced::{alignment, Element, Length};

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub state: &'a State,
    pub busy: bool,
}

#[derive(Debug, Clone)]
pub struct State {
    pub game_id: DocumentId,
    pub game: Option<CardGame>,
    pub versions: Option<Vec<Version>>,
    pub new_version: String,
}

#[derive(Debug, Clone)]
pub enum Message {
    GameLoaded(Result<Option<CardGame>, Error>),
    VersionsLoaded(Result<Vec<Version>, Error>),
    NewVersionChanged(String),
    Add,
    AddFinished(Result<DocumentId, Error>),
    OpenVersion(DocumentId),
    Back,
}

#[derive(Debug, Clone)]
pub enum Event {
    None,
    AddVersion { card_game_name: String, version_name: String },
    OpenVersion(DocumentId),
    Back,
}

impl State {
    #[must_use]
    pub fn new(game_id: DocumentId) -> Self {
        Self {
            game_id,
            game: None,
            versions: None,
            new_version: String::new(),
        }
    }

    /// Name the versions feed is keyed by, once the game is loaded.
    #[must_use]
    pub fn card_game_name(&self) -> Option<&str> {
        self.game.as_ref().map(|game| game.name.as_str())
    }

    pub fn update(&mut self, message: Message, notifications: &Manager) -> Event {
        match message {
            Message::GameLoaded(Ok(Some(game))) => {
                self.game = Some(game);
                Event::None
            }
            Message::GameLoaded(Ok(None)) => {
                notifications.error("error-store-not-found");
                Event::Back
            }
            Message::GameLoaded(Err(err)) | Message::VersionsLoaded(Err(err)) => {
                tracing::warn!(%err, game = %self.game_id, "card game detail failed to load");
                notifications.error(err.i18n_key());
                Event::None
            }
            Message::VersionsLoaded(Ok(versions)) => {
                self.versions = Some(versions);
                Event::None
            }
            Message::NewVersionChanged(name) => {
                self.new_version = name;
                Event::None
            }
            Message::Add => {
                let Some(card_game_name) = self.card_game_name() else {
                    notifications.error(FormError::MissingContext.i18n_key());
                    return Event::None;
                };
                let version_name = self.new_version.trim();
                if version_name.is_empty() {
                    notifications.error(FormError::NameRequired.i18n_key());
                    return Event::None;
                }
                Event::AddVersion {
                    card_game_name: card_game_name.to_string(),
                    version_name: version_name.to_string(),
                }
            }
            Message::AddFinished(Ok(_)) => {
                self.new_version.clear();
                notifications.success("notification-version-added");
                Event::None
            }
            Message::AddFinished(Err(err)) => {
                notifications.error(err.i18n_key());
                Event::None
            }
            Message::OpenVersion(id) => Event::OpenVersion(id),
            Message::Back => Event::Back,
        }
    }
}

fn version_tile(version: &Version) -> Element<'_, Message> {
    button(
        Column::new()
            .spacing(spacing::XXS)
            .push(Text::new(version.version_name.as_str()).size(typography::TITLE_SM))
            .push(Text::new(format::timestamp(version.created_at)).size(typography::CAPTION)),
    )
    .on_press(Message::OpenVersion(version.id.clone()))
    .padding(spacing::SM)
    .width(Length::Fixed(sizing::CARD_TILE_WIDTH))
    .style(styles::button::tile)
    .into()
}

#[allow(clippy::needless_pass_by_value)]
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let i18n = ctx.i18n;
    let state = ctx.state;

    let title = state
        .card_game_name()
        .map_or_else(|| i18n.tr("list-loading"), str::to_string);

    let header = Row::new()
        .spacing(spacing::SM)
        .align_y(alignment::Vertical::Center)
        .push(
            button(Text::new(i18n.tr("action-back")))
                .on_press(Message::Back)
                .style(styles::button::ghost),
        )
        .push(Text::new(title).size(typography::TITLE_MD));

    let submit = (!ctx.busy && state.game.is_some()).then_some(Message::Add);
    let add_form = Row::new()
        .spacing(spacing::XS)
        .align_y(alignment::Vertical::Center)
        .push(
            text_input(&i18n.tr("versions-new-placeholder"), &state.new_version)
                .on_input(Message::NewVersionChanged)
                .on_submit_maybe(submit.clone())
                .padding(spacing::XS)
                .width(Length::Fixed(sizing::AUTH_FORM_WIDTH)),
        )
        .push(
            button(Text::new(i18n.tr("versions-add")))
                .on_press_maybe(submit)
                .padding(spacing::XS)
                .style(styles::button::primary),
        );

    let body: Element<'_, Message> = match &state.versions {
        None => Text::new(i18n.tr("list-loading")).into(),
        Some(versions) if versions.is_empty() => Text::new(i18n.tr("versions-empty")).into(),
        Some(versions) => Row::with_children(versions.iter().map(version_tile))
            .spacing(spacing::SM)
            .wrap()
            .vertical_spacing(spacing::SM)
            .into(),
    };

    Container::new(
        Column::new()
            .spacing(spacing::MD)
            .push(header)
            .push(Text::new(i18n.tr("versions-title")).size(typography::TITLE_SM))
            .push(add_form)
            .push(scrollable(body).height(Length::Fill)),
    )
    .padding(spacing::LG)
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_state() -> State {
        let mut state = State::new(DocumentId::new("g1"));
        state.game = Some(CardGame {
            id: DocumentId::new("g1"),
            name: "ポケモン".into(),
            created_at: None,
            updated_at: None,
        });
        state
    }

    #[test]
    fn add_waits_for_card_game() {
        let notifications = Manager::new();
        let mut state = State::new(DocumentId::new("g1"));
        state.new_version = "SV1".into();
        assert!(matches!(state.update(Message::Add, &notifications), Event::None));
        assert_eq!(
            notifications.visible()[0].message_key(),
            "error-form-missing-context"
        );
    }

    #[test]
    fn add_carries_game_and_version_names() {
        let notifications = Manager::new();
        let mut state = loaded_state();
        state.new_version = " SV1 ".into();
        match state.update(Message::Add, &notifications) {
            Event::AddVersion {
                card_game_name,
                version_name,
            } => {
                assert_eq!(card_game_name, "ポケモン");
                assert_eq!(version_name, "SV1");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn missing_card_game_goes_back() {
        let notifications = Manager::new();
        let mut state = State::new(DocumentId::new("gone"));
        assert!(matches!(
            state.update(Message::GameLoaded(Ok(None)), &notifications),
            Event::Back
        ));
    }
}
