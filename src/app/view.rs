// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.
//!
//! The window is a stack of three layers: the current screen (with the
//! sidebar on protected screens), the busy overlay while an action is in
//! flight or the session is still being checked, and the toasts on top.

use super::{Message, Screen};
use crate::application::session::{Access, AuthState};
use crate::i18n::fluent::I18n;
use crate::ui::card_detail;
use crate::ui::card_game_detail;
use crate::ui::card_games;
use crate::ui::dashboard;
use crate::ui::login;
use crate::ui::notifications::{self, Toast};
use crate::ui::register;
use crate::ui::sidebar;
use crate::ui::version_detail;
use crate::ui::widgets::busy_overlay;
use iced::widget::{Container, Row, Stack};
use iced::{Element, Length};

/// Context required to render the application view.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub screen: &'a Screen,
    pub auth: &'a AuthState,
    pub busy: bool,
    pub spinner_rotation: f32,
    pub notifications: &'a notifications::Manager,
}

/// Renders the current application view based on the active screen.
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let access = ctx.auth.access(ctx.screen.is_protected());

    let content: Element<'_, Message> = match access {
        Access::Granted => view_screen(&ctx),
        // Nothing protected is drawn until the session is known.
        Access::Checking | Access::RedirectToLogin => Container::new(iced::widget::Space::new())
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
    };

    let mut layers = Stack::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .push(content);

    if access == Access::Checking {
        layers = layers.push(busy_overlay::view(
            ctx.i18n.tr("busy-checking-auth"),
            ctx.spinner_rotation,
        ));
    } else if ctx.busy {
        layers = layers.push(busy_overlay::view(
            ctx.i18n.tr("busy-processing"),
            ctx.spinner_rotation,
        ));
    }

    layers
        .push(Toast::view_overlay(ctx.notifications, ctx.i18n).map(Message::Notification))
        .into()
}

fn view_screen<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let i18n = ctx.i18n;
    let busy = ctx.busy;

    let page: Element<'a, Message> = match ctx.screen {
        Screen::Login(state) => {
            return login::view(login::ViewContext { i18n, state, busy }).map(Message::Login);
        }
        Screen::Register(state) => {
            return register::view(register::ViewContext { i18n, state, busy })
                .map(Message::Register);
        }
        Screen::Dashboard => dashboard::view(dashboard::ViewContext {
            i18n,
            email: signed_in_email(ctx.auth),
            busy,
        })
        .map(Message::Dashboard),
        Screen::CardGames(state) => card_games::view(card_games::ViewContext { i18n, state, busy })
            .map(Message::CardGames),
        Screen::CardGame(state) => {
            card_game_detail::view(card_game_detail::ViewContext { i18n, state, busy })
                .map(Message::CardGame)
        }
        Screen::Version(state) => {
            version_detail::view(version_detail::ViewContext { i18n, state, busy })
                .map(Message::Version)
        }
        Screen::Card(state) => {
            card_detail::view(card_detail::ViewContext { i18n, state, busy }).map(Message::Card)
        }
    };

    let sidebar = sidebar::view(sidebar::ViewContext {
        i18n,
        email: signed_in_email(ctx.auth),
        active: ctx.screen.section(),
        busy,
    })
    .map(Message::Sidebar);

    Row::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .push(sidebar)
        .push(page)
        .into()
}

fn signed_in_email(auth: &AuthState) -> &str {
    auth.user().map_or("", |user| user.email.as_str())
}
