// SPDX-License-Identifier: MPL-2.0
//! Card game grid: the root of the price list.
//!
//! Tiles open the card game. In edit mode the tiles turn into inline rename
//! fields with a two-step delete instead.

use crate::application::catalog::CardGame;
use crate::application::card_form::FormError;
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

#[derive(Debug, Clone, Default)]
pub struct State {
    /// `None` until the live list delivered its first snapshot.
    pub games: Option<Vec<CardGame>>,
    pub new_name: String,
    pub edit_mode: bool,
    pub renaming: Option<(DocumentId, String)>,
    pub confirm_delete: Option<DocumentId>,
}

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(Result<Vec<CardGame>, Error>),
    NewNameChanged(String),
    Add,
    AddFinished(Result<DocumentId, Error>),
    ToggleEditMode,
    StartRename(DocumentId),
    RenameChanged(String),
    CommitRename,
    CancelRename,
    RenameFinished(Result<(), Error>),
    RequestDelete(DocumentId),
    ConfirmDelete,
    CancelDelete,
    DeleteFinished(Result<(), Error>),
    Open(DocumentId),
}

#[derive(Debug, Clone)]
pub enum Event {
    None,
    Add { name: String },
    Rename { id: DocumentId, name: String },
    Delete { id: DocumentId },
    Open(DocumentId),
}

impl State {
    pub fn update(&mut self, message: Message, notifications: &Manager) -> Event {
        match message {
            Message::Loaded(Ok(games)) => {
                if let Some((id, _)) = &self.renaming {
                    if !games.iter().any(|game| &game.id == id) {
                        self.renaming = None;
                    }
                }
                self.games = Some(games);
                Event::None
            }
            Message::Loaded(Err(err)) => {
                tracing::warn!(%err, "card game list failed");
                notifications.error(err.i18n_key());
                Event::None
            }
            Message::NewNameChanged(name) => {
                self.new_name = name;
                Event::None
            }
            Message::Add => {
                let name = self.new_name.trim();
                if name.is_empty() {
                    notifications.error(FormError::NameRequired.i18n_key());
                    return Event::None;
                }
                Event::Add {
                    name: name.to_string(),
                }
            }
            Message::AddFinished(Ok(_)) => {
                self.new_name.clear();
                notifications.success("notification-card-game-added");
                Event::None
            }
            Message::AddFinished(Err(err)) => {
                notifications.error(err.i18n_key());
                Event::None
            }
            Message::ToggleEditMode => {
                self.edit_mode = !self.edit_mode;
                self.renaming = None;
                self.confirm_delete = None;
                Event::None
            }
            Message::StartRename(id) => {
                let current = self
                    .games
                    .iter()
                    .flatten()
                    .find(|game| game.id == id)
                    .map(|game| game.name.clone())
                    .unwrap_or_default();
                self.renaming = Some((id, current));
                self.confirm_delete = None;
                Event::None
            }
            Message::RenameChanged(name) => {
                if let Some((_, draft)) = &mut self.renaming {
                    *draft = name;
                }
                Event::None
            }
            Message::CommitRename => {
                let Some((id, draft)) = &self.renaming else {
                    return Event::None;
                };
                let name = draft.trim();
                if name.is_empty() {
                    notifications.error(FormError::NameRequired.i18n_key());
                    return Event::None;
                }
                Event::Rename {
                    id: id.clone(),
                    name: name.to_string(),
                }
            }
            Message::CancelRename => {
                self.renaming = None;
                Event::None
            }
            Message::RenameFinished(Ok(())) => {
                self.renaming = None;
                notifications.success("notification-card-game-renamed");
                Event::None
            }
            Message::RenameFinished(Err(err)) => {
                notifications.error(err.i18n_key());
                Event::None
            }
            Message::RequestDelete(id) => {
                self.confirm_delete = Some(id);
                self.renaming = None;
                Event::None
            }
            Message::ConfirmDelete => match self.confirm_delete.take() {
                Some(id) => Event::Delete { id },
                None => Event::None,
            },
            Message::CancelDelete => {
                self.confirm_delete = None;
                Event::None
            }
            Message::DeleteFinished(Ok(())) => {
                notifications.success("notification-card-game-deleted");
                Event::None
            }
            Message::DeleteFinished(Err(err)) => {
                notifications.error(err.i18n_key());
                Event::None
            }
            Message::Open(id) if !self.edit_mode => Event::Open(id),
            Message::Open(_) => Event::None,
        }
    }
}

fn add_form<'a>(i18n: &I18n, state: &'a State, busy: bool) -> Element<'a, Message> {
    let submit = (!busy).then_some(Message::Add);
    Row::new()
        .spacing(spacing::XS)
        .align_y(alignment::Vertical::Center)
        .push(
            text_input(&i18n.tr("card-games-new-placeholder"), &state.new_name)
                .on_input(Message::NewNameChanged)
                .on_submit_maybe(submit.clone())
                .padding(spacing::XS)
                .width(Length::Fixed(sizing::AUTH_FORM_WIDTH)),
        )
        .push(
            button(Text::new(i18n.tr("card-games-add")))
                .on_press_maybe(submit)
                .padding(spacing::XS)
                .style(styles::button::primary),
        )
        .into()
}

fn tile<'a>(i18n: &I18n, state: &'a State, game: &'a CardGame, busy: bool) -> Element<'a, Message> {
    let idle = |message: Message| (!busy).then_some(message);

    if !state.edit_mode {
        let content = Column::new()
            .spacing(spacing::XXS)
            .push(Text::new(game.name.as_str()).size(typography::TITLE_SM))
            .push(Text::new(format::timestamp(game.created_at)).size(typography::CAPTION));
        return button(content)
            .on_press(Message::Open(game.id.clone()))
            .padding(spacing::SM)
            .width(Length::Fixed(sizing::CARD_TILE_WIDTH))
            .style(styles::button::tile)
            .into();
    }

    let mut content = Column::new().spacing(spacing::XS);

    match &state.renaming {
        Some((id, draft)) if id == &game.id => {
            content = content
                .push(
                    text_input(&i18n.tr("card-games-rename-placeholder"), draft)
                        .on_input(Message::RenameChanged)
                        .on_submit_maybe(idle(Message::CommitRename))
                        .padding(spacing::XXS),
                )
                .push(
                    Row::new()
                        .spacing(spacing::XXS)
                        .push(
                            button(Text::new(i18n.tr("action-save")).size(typography::BODY_SM))
                                .on_press_maybe(idle(Message::CommitRename))
                                .style(styles::button::primary),
                        )
                        .push(
                            button(Text::new(i18n.tr("action-cancel")).size(typography::BODY_SM))
                                .on_press(Message::CancelRename)
                                .style(styles::button::ghost),
                        ),
                );
        }
        _ => {
            content = content
                .push(Text::new(game.name.as_str()).size(typography::TITLE_SM))
                .push(Text::new(format::timestamp(game.created_at)).size(typography::CAPTION));

            let actions = if state.confirm_delete.as_ref() == Some(&game.id) {
                Row::new()
                    .spacing(spacing::XXS)
                    .push(Text::new(i18n.tr("confirm-delete-question")).size(typography::BODY_SM))
                    .push(
                        button(Text::new(i18n.tr("action-delete")).size(typography::BODY_SM))
                            .on_press_maybe(idle(Message::ConfirmDelete))
                            .style(styles::button::danger),
                    )
                    .push(
                        button(Text::new(i18n.tr("action-cancel")).size(typography::BODY_SM))
                            .on_press(Message::CancelDelete)
                            .style(styles::button::ghost),
                    )
            } else {
                Row::new()
                    .spacing(spacing::XXS)
                    .push(
                        button(Text::new(i18n.tr("action-rename")).size(typography::BODY_SM))
                            .on_press(Message::StartRename(game.id.clone()))
                            .style(styles::button::ghost),
                    )
                    .push(
                        button(Text::new(i18n.tr("action-delete")).size(typography::BODY_SM))
                            .on_press(Message::RequestDelete(game.id.clone()))
                            .style(styles::button::danger),
                    )
            };
            content = content.push(actions);
        }
    }

    Container::new(content)
        .padding(spacing::SM)
        .width(Length::Fixed(sizing::CARD_TILE_WIDTH))
        .style(styles::container::panel)
        .into()
}

#[allow(clippy::needless_pass_by_value)]
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let i18n = ctx.i18n;
    let state = ctx.state;

    let edit_label = if state.edit_mode {
        i18n.tr("card-games-edit-done")
    } else {
        i18n.tr("card-games-edit")
    };
    let header = Row::new()
        .spacing(spacing::SM)
        .align_y(alignment::Vertical::Center)
        .push(Text::new(i18n.tr("card-games-title")).size(typography::TITLE_MD))
        .push(iced::widget::Space::new().width(Length::Fill))
        .push(
            button(Text::new(edit_label))
                .on_press(Message::ToggleEditMode)
                .padding(spacing::XS)
                .style(if state.edit_mode {
                    styles::button::selected
                } else {
                    styles::button::unselected
                }),
        );

    let body: Element<'_, Message> = match &state.games {
        None => Text::new(i18n.tr("list-loading")).into(),
        Some(games) if games.is_empty() => Text::new(i18n.tr("card-games-empty")).into(),
        Some(games) => Row::with_children(
            games
                .iter()
                .map(|game| tile(i18n, state, game, ctx.busy)),
        )
        .spacing(spacing::SM)
        .wrap()
        .vertical_spacing(spacing::SM)
        .into(),
    };

    let content = Column::new()
        .spacing(spacing::MD)
        .push(header)
        .push(add_form(i18n, state, ctx.busy))
        .push(scrollable(body).height(Length::Fill));

    Container::new(content)
        .padding(spacing::LG)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: &str, name: &str) -> CardGame {
        CardGame {
            id: DocumentId::new(id),
            name: name.to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn blank_name_is_rejected_with_toast() {
        let notifications = Manager::new();
        let mut state = State {
            new_name: "   ".into(),
            ..State::default()
        };
        assert!(matches!(state.update(Message::Add, &notifications), Event::None));
        assert_eq!(notifications.visible_count(), 1);
    }

    #[test]
    fn add_requests_trimmed_name_and_clears_on_success() {
        let notifications = Manager::new();
        let mut state = State {
            new_name: " ポケモン ".into(),
            ..State::default()
        };
        match state.update(Message::Add, &notifications) {
            Event::Add { name } => assert_eq!(name, "ポケモン"),
            other => panic!("unexpected event {other:?}"),
        }
        state.update(
            Message::AddFinished(Ok(DocumentId::new("g1"))),
            &notifications,
        );
        assert!(state.new_name.is_empty());
        assert_eq!(notifications.visible()[0].message_key(), "notification-card-game-added");
    }

    #[test]
    fn tiles_only_open_outside_edit_mode() {
        let notifications = Manager::new();
        let mut state = State::default();
        assert!(matches!(
            state.update(Message::Open(DocumentId::new("g1")), &notifications),
            Event::Open(_)
        ));
        state.update(Message::ToggleEditMode, &notifications);
        assert!(matches!(
            state.update(Message::Open(DocumentId::new("g1")), &notifications),
            Event::None
        ));
    }

    #[test]
    fn delete_needs_confirmation() {
        let notifications = Manager::new();
        let mut state = State {
            edit_mode: true,
            ..State::default()
        };
        assert!(matches!(
            state.update(Message::RequestDelete(DocumentId::new("g1")), &notifications),
            Event::None
        ));
        match state.update(Message::ConfirmDelete, &notifications) {
            Event::Delete { id } => assert_eq!(id.as_str(), "g1"),
            other => panic!("unexpected event {other:?}"),
        }
        assert!(state.confirm_delete.is_none());
        assert!(matches!(
            state.update(Message::ConfirmDelete, &notifications),
            Event::None
        ));
    }

    #[test]
    fn rename_starts_from_current_name() {
        let notifications = Manager::new();
        let mut state = State {
            games: Some(vec![game("g1", "遊戯王")]),
            edit_mode: true,
            ..State::default()
        };
        state.update(Message::StartRename(DocumentId::new("g1")), &notifications);
        assert_eq!(
            state.renaming,
            Some((DocumentId::new("g1"), "遊戯王".to_string()))
        );
        state.update(Message::RenameChanged("遊☆戯☆王".into()), &notifications);
        match state.update(Message::CommitRename, &notifications) {
            Event::Rename { name, .. } => assert_eq!(name, "遊☆戯☆王"),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn vanished_game_cancels_rename() {
        let notifications = Manager::new();
        let mut state = State {
            renaming: Some((DocumentId::new("gone"), "x".into())),
            ..State::default()
        };
        state.update(Message::Loaded(Ok(vec![game("g1", "a")])), &notifications);
        assert!(state.renaming.is_none());
    }
}
