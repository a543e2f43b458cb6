// SPDX-License-Identifier: GPL-3.0-only

//! Last-photo thumbnail card

use super::card_style;
use crate::app::session::ThumbnailContent;
use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use cosmic::Element;
use cosmic::iced::Length;
use cosmic::widget::{self, icon};

impl AppModel {
    /// Build the thumbnail card
    ///
    /// Holds the last saved photo while its display window runs, and an
    /// empty space of the same size otherwise so the capture button stays
    /// centered.
    pub fn build_thumbnail(&self) -> Element<'_, Message> {
        let size = Length::Fixed(ui::THUMBNAIL_CARD);

        let content: Element<'_, Message> = match self.session.thumbnail_content() {
            ThumbnailContent::Hidden => return widget::Space::new(size, size).into(),
            // Saved, thumbnail still decoding or undecodable
            ThumbnailContent::Placeholder => {
                widget::container(icon::from_name("image-x-generic-symbolic").size(24))
                    .center(Length::Fill)
                    .into()
            }
            ThumbnailContent::Image(handle) => widget::image::Image::new(handle)
                .content_fit(cosmic::iced::ContentFit::Cover)
                .width(size)
                .height(size)
                .into(),
        };

        widget::container(content)
            .width(size)
            .height(size)
            .padding(2)
            .style(card_style)
            .into()
    }
}
