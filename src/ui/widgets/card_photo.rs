// SPDX-License-Identifier: MPL-2.0
//! Card photo preview.

use crate::infrastructure::fs_blobs::path_from_url;
use crate::ui::design_tokens::typography;
use crate::ui::styles;
use iced::widget::image::{self, Handle};
use iced::widget::{Container, Text};
use iced::{ContentFit, Element, Length};

/// Where a preview comes from.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    /// Freshly picked file, not uploaded yet.
    Picked(&'a Handle),
    /// Stored photo URL.
    Stored(&'a str),
    None,
}

/// Image handle for a stored photo URL. Only local `file://` URLs can be
/// shown; other schemes fall back to the placeholder.
#[must_use]
pub fn stored_handle(url: &str) -> Option<Handle> {
    path_from_url(url).map(Handle::from_path)
}

pub fn view<'a, Message: 'a>(
    source: Source<'_>,
    placeholder: String,
    width: f32,
    height: f32,
) -> Element<'a, Message> {
    let handle = match source {
        Source::Picked(handle) => Some(handle.clone()),
        Source::Stored(url) => stored_handle(url),
        Source::None => None,
    };

    let content: Element<'a, Message> = match handle {
        Some(handle) => image::Image::new(handle)
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => Text::new(placeholder).size(typography::CAPTION).into(),
    };

    Container::new(content)
        .width(Length::Fixed(width))
        .height(Length::Fixed(height))
        .center_x(Length::Fixed(width))
        .center_y(Length::Fixed(height))
        .style(styles::container::photo_frame)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_file_urls_have_handles() {
        assert!(stored_handle("file:///tmp/a.jpg").is_some());
        assert!(stored_handle("https://example.com/a.jpg").is_none());
    }
}
