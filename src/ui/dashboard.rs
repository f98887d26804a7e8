// SPDX-License-Identifier: MPL-2.0
//! Landing screen after sign-in.

use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{spacing, typography};
use crate::ui::styles;
use iced::widget::{button, Column, Container, Text};
use iced::{Element, Length};

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub email: &'a str,
    pub busy: bool,
}

#[derive(Debug, Clone)]
pub enum Message {
    OpenPriceList,
    Logout,
}

#[allow(clippy::needless_pass_by_value)]
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let i18n = ctx.i18n;

    let content = Column::new()
        .spacing(spacing::MD)
        .push(Text::new(i18n.tr("dashboard-title")).size(typography::TITLE_LG))
        .push(
            Text::new(i18n.tr_with_args("dashboard-signed-in-as", &[("email", ctx.email)]))
                .size(typography::BODY_LG),
        )
        .push(
            button(Text::new(i18n.tr("sidebar-price-list")))
                .on_press(Message::OpenPriceList)
                .padding(spacing::XS)
                .style(styles::button::primary),
        )
        .push(
            button(Text::new(i18n.tr("sidebar-logout")))
                .on_press_maybe((!ctx.busy).then_some(Message::Logout))
                .padding(spacing::XS)
                .style(styles::button::danger),
        );

    Container::new(content)
        .padding(spacing::XL)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
