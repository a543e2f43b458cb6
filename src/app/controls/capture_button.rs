// SPDX-License-Identifier: GPL-3.0-only

//! Capture button widget implementation

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use cosmic::Element;
use cosmic::iced::{Background, Color, Length};
use cosmic::widget;

impl AppModel {
    /// Build the photo capture button
    ///
    /// A white circle that shrinks and turns gray while a photo is being
    /// taken. Presses are not accepted until the capture finishes.
    pub fn build_capture_button(&self) -> Element<'_, Message> {
        let busy = self.session.capture_in_flight;

        let color = if busy {
            Color::from_rgb(0.7, 0.7, 0.7)
        } else {
            Color::WHITE
        };

        // Press-down effect while busy
        let scale = if busy { 0.85 } else { 1.0 };
        let inner_size = ui::CAPTURE_BUTTON_INNER * scale;
        let outer_size = ui::CAPTURE_BUTTON_OUTER * scale;

        let button_inner = widget::container(widget::Space::new(
            Length::Fixed(inner_size),
            Length::Fixed(inner_size),
        ))
        .style(move |_theme| widget::container::Style {
            background: Some(Background::Color(color)),
            border: cosmic::iced::Border {
                radius: [ui::CAPTURE_BUTTON_RADIUS * scale; 4].into(),
                ..Default::default()
            },
            ..Default::default()
        });

        let mut button = widget::button::custom(button_inner)
            .padding(0)
            .width(Length::Fixed(outer_size))
            .height(Length::Fixed(outer_size));
        if !busy {
            button = button.on_press(Message::Capture);
        }

        // Fixed-size wrapper keeps the row from shifting when the button shrinks
        widget::container(button)
            .width(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .height(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .center_x(ui::CAPTURE_BUTTON_OUTER)
            .center_y(ui::CAPTURE_BUTTON_OUTER)
            .into()
    }
}
