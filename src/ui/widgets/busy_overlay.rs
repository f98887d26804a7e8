// SPDX-License-Identifier: MPL-2.0
//! Full-window busy overlay: dimmed scrim, spinner and a caption.
//!
//! The overlay is wrapped in `opaque` so clicks and keystrokes never reach
//! the screen underneath while a backend action is in flight.

use super::AnimatedSpinner;
use crate::ui::design_tokens::{palette, spacing, typography};
use crate::ui::styles;
use iced::widget::{opaque, Column, Container, Text};
use iced::{alignment, Element, Length};

pub fn view<'a, Message: 'static>(caption: String, rotation: f32) -> Element<'a, Message> {
    let content = Column::new()
        .spacing(spacing::SM)
        .align_x(alignment::Horizontal::Center)
        .push(AnimatedSpinner::new(palette::WHITE, rotation).into_element())
        .push(Text::new(caption).size(typography::BODY_LG));

    opaque(
        Container::new(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .style(styles::container::scrim),
    )
}
