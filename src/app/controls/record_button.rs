// SPDX-License-Identifier: GPL-3.0-only

//! Record/stop button with the running duration

use super::card_style;
use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Color, Length};
use cosmic::widget;

impl AppModel {
    /// Build the record button
    ///
    /// Shows a red dot and "Record" when idle, and the elapsed time with
    /// "Stop" while recording.
    pub fn build_record_button(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();
        let recording = self.session.recording.is_recording();

        let dot_color = if recording {
            Color::from_rgb(0.6, 0.05, 0.05)
        } else {
            Color::from_rgb(0.9, 0.1, 0.1)
        };
        let red_dot =
            widget::container(widget::Space::new(Length::Fixed(12.0), Length::Fixed(12.0))).style(
                move |_theme| widget::container::Style {
                    background: Some(Background::Color(dot_color)),
                    border: cosmic::iced::Border {
                        radius: [6.0; 4].into(),
                        ..Default::default()
                    },
                    ..Default::default()
                },
            );

        let label = if recording {
            let elapsed = self.session.recording.elapsed_secs();
            format!(
                "{} {:02}:{:02}",
                fl!("record-stop"),
                elapsed / 60,
                elapsed % 60
            )
        } else {
            fl!("record-start")
        };

        let content = widget::row()
            .push(red_dot)
            .push(widget::text(label).size(14))
            .spacing(spacing.space_xxs)
            .align_y(Alignment::Center);

        let mut button = widget::button::custom(content)
            .padding([spacing.space_xs, spacing.space_s])
            .class(if recording {
                cosmic::theme::Button::Destructive
            } else {
                cosmic::theme::Button::Text
            });
        if self.session.binding().is_some() {
            button = button.on_press(Message::ToggleRecording);
        }

        widget::container(button)
            .height(Length::Fixed(ui::THUMBNAIL_CARD))
            .center_y(ui::THUMBNAIL_CARD)
            .style(card_style)
            .into()
    }
}
