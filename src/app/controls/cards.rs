// SPDX-License-Identifier: GPL-3.0-only

//! Switch camera, flash and torch cards

use super::card_style;
use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::widget::{self, icon};

impl AppModel {
    /// Build the row of toggle cards above the capture controls
    pub fn build_control_cards(&self) -> Element<'_, Message> {
        let flash_label = if self.session.flash.is_on() {
            fl!("flash-on")
        } else {
            fl!("flash-off")
        };
        let torch_label = if self.session.torch {
            fl!("torch-on")
        } else {
            fl!("torch-off")
        };

        widget::row()
            .push(control_card(
                "camera-switch-symbolic",
                fl!("switch-camera"),
                false,
                Message::SwitchCamera,
            ))
            .push(control_card(
                if self.session.flash.is_on() {
                    "flash-symbolic"
                } else {
                    "flash-off-symbolic"
                },
                flash_label,
                self.session.flash.is_on(),
                Message::ToggleFlash,
            ))
            .push(control_card(
                "weather-clear-symbolic",
                torch_label,
                self.session.torch,
                Message::ToggleTorch,
            ))
            .spacing(ui::CARD_SPACING)
            .width(Length::Fill)
            .into()
    }
}

fn control_card<'a>(
    icon_name: &'static str,
    label: String,
    active: bool,
    message: Message,
) -> Element<'a, Message> {
    let spacing = cosmic::theme::spacing();

    let content = widget::column()
        .push(icon::from_name(icon_name).size(20))
        .push(widget::text(label).size(12))
        .spacing(spacing.space_xxxs)
        .align_x(Alignment::Center)
        .width(Length::Fill);

    let button = widget::button::custom(content)
        .on_press(message)
        .padding(spacing.space_xs)
        .width(Length::Fill)
        .class(if active {
            cosmic::theme::Button::Suggested
        } else {
            cosmic::theme::Button::Text
        });

    widget::container(button)
        .width(Length::Fill)
        .style(card_style)
        .into()
}
