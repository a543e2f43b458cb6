// SPDX-License-Identifier: GPL-3.0-only

//! Capture controls module
//!
//! UI components laid over the preview:
//! - Control cards (switch camera, flash, torch)
//! - Capture button and record button
//! - Last-photo thumbnail card

pub mod capture_button;
pub mod cards;
pub mod record_button;
pub mod thumbnail;

use crate::constants::ui;
use cosmic::iced::{Background, Color};
use cosmic::widget;

/// Translucent dark card drawn behind a group of controls
pub(crate) fn card_style(_theme: &cosmic::Theme) -> widget::container::Style {
    widget::container::Style {
        background: Some(Background::Color(Color::from_rgba(
            0.0,
            0.0,
            0.0,
            ui::OVERLAY_BACKGROUND_ALPHA,
        ))),
        text_color: Some(Color::WHITE),
        border: cosmic::iced::Border {
            radius: [ui::CARD_RADIUS; 4].into(),
            ..Default::default()
        },
        ..Default::default()
    }
}
