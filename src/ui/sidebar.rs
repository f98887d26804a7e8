// SPDX-License-Identifier: MPL-2.0
//! Navigation sidebar shown next to every protected screen.

use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use iced::widget::{button, rule, Column, Container, Text};
use iced::{Element, Length};

/// Which sidebar entry is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    PriceList,
}

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub email: &'a str,
    pub active: Section,
    pub busy: bool,
}

#[derive(Debug, Clone)]
pub enum Message {
    OpenDashboard,
    OpenPriceList,
    Logout,
}

fn entry<'a>(label: String, selected: bool, message: Message) -> Element<'a, Message> {
    let style = if selected {
        styles::button::selected
    } else {
        styles::button::unselected
    };
    button(Text::new(label).size(typography::BODY))
        .on_press(message)
        .padding(spacing::XS)
        .width(Length::Fill)
        .style(style)
        .into()
}

#[allow(clippy::needless_pass_by_value)]
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let i18n = ctx.i18n;

    let content = Column::new()
        .spacing(spacing::XS)
        .push(Text::new(i18n.tr("app-name")).size(typography::TITLE_SM))
        .push(rule::horizontal(1))
        .push(entry(
            i18n.tr("sidebar-dashboard"),
            ctx.active == Section::Dashboard,
            Message::OpenDashboard,
        ))
        .push(entry(
            i18n.tr("sidebar-price-list"),
            ctx.active == Section::PriceList,
            Message::OpenPriceList,
        ))
        .push(iced::widget::Space::new().height(Length::Fill))
        .push(rule::horizontal(1))
        .push(Text::new(ctx.email).size(typography::CAPTION))
        .push(
            button(Text::new(i18n.tr("sidebar-logout")).size(typography::BODY))
                .on_press_maybe((!ctx.busy).then_some(Message::Logout))
                .padding(spacing::XS)
                .width(Length::Fill)
                .style(styles::button::danger),
        );

    Container::new(content)
        .padding(spacing::SM)
        .width(Length::Fixed(sizing::SIDEBAR_WIDTH))
        .height(Length::Fill)
        .style(styles::container::sidebar)
        .into()
}
