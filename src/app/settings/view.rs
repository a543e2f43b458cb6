// SPDX-License-Identifier: GPL-3.0-only

//! Settings drawer view

use crate::app::state::{AppModel, ContextPage, Message};
use crate::fl;
use cosmic::Element;
use cosmic::app::context_drawer;
use cosmic::iced::{Alignment, Length};
use cosmic::widget;

impl AppModel {
    /// Create the settings view for the context drawer
    ///
    /// Appearance, preview mirroring and capture quality.
    pub fn settings_view(&self) -> context_drawer::ContextDrawer<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let theme_dropdown = widget::dropdown(
            &self.settings_options.themes,
            Some(self.config.app_theme.index()),
            Message::SelectTheme,
        );

        let quality_dropdown = widget::dropdown(
            &self.settings_options.jpeg_qualities,
            Some(self.config.jpeg_quality.index()),
            Message::SelectJpegQuality,
        );

        let bitrate_dropdown = widget::dropdown(
            &self.settings_options.bitrate_presets,
            Some(self.config.bitrate_preset.index()),
            Message::SelectBitratePreset,
        );

        let mirror_toggle =
            widget::toggler(self.config.mirror_preview).on_toggle(|_| Message::ToggleMirrorPreview);

        let settings_column: Element<'_, Message> = widget::column()
            .push(section_title(fl!("settings-theme")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(theme_dropdown)
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::row()
                    .push(section_title(fl!("settings-mirror-preview")))
                    .push(widget::horizontal_space().width(Length::Fill))
                    .push(mirror_toggle)
                    .align_y(Alignment::Center),
            )
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(section_title(fl!("settings-photo-quality")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(quality_dropdown)
            .push(widget::vertical_space().height(spacing.space_s))
            .push(section_title(fl!("settings-video-quality")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(bitrate_dropdown)
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::text(fl!("settings-version", version = env!("GIT_VERSION")))
                    .size(12)
                    .class(cosmic::theme::Text::Accent),
            )
            .spacing(0)
            .into();

        context_drawer::context_drawer(
            settings_column,
            Message::ToggleContextPage(ContextPage::Settings),
        )
        .title(fl!("settings"))
    }
}

fn section_title<'a>(label: String) -> Element<'a, Message> {
    widget::text(label)
        .size(16)
        .font(cosmic::font::bold())
        .into()
}
