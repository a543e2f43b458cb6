// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! Composes the window from:
//! - Permission screen (pending or denied)
//! - Camera preview with the screen-flash overlay
//! - Control cards and capture row (controls module)
//! - Toasts on top of everything

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::fl;
use crate::permissions::CameraPermission;
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Color, ContentFit, Length};
use cosmic::widget::{self, icon};

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        let content = match &self.session.permission {
            CameraPermission::Pending => permission_screen(fl!("permission-pending"), None),
            CameraPermission::Denied(reason) => {
                permission_screen(fl!("permission-required"), Some(reason.to_string()))
            }
            CameraPermission::Granted => self.camera_screen(),
        };

        widget::toaster(&self.toasts, content)
    }

    /// Preview with the controls laid over its lower edge
    fn camera_screen(&self) -> Element<'_, Message> {
        let camera_preview = self.build_camera_preview();

        // Screen flash: only the preview under a white overlay, no controls
        if self.flash_active {
            let flash_overlay = widget::container(widget::Space::new(Length::Fill, Length::Fill))
                .width(Length::Fill)
                .height(Length::Fill)
                .style(|_theme| widget::container::Style {
                    background: Some(Background::Color(Color::WHITE)),
                    ..Default::default()
                });

            return black_backdrop(
                cosmic::iced::widget::stack![camera_preview, flash_overlay]
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .into(),
            );
        }

        let spacing = cosmic::theme::spacing();

        let capture_row = widget::row()
            .push(self.build_thumbnail())
            .push(widget::horizontal_space().width(Length::Fill))
            .push(self.build_capture_button())
            .push(widget::horizontal_space().width(Length::Fill))
            .push(self.build_record_button())
            .align_y(Alignment::Center)
            .width(Length::Fill);

        let controls = widget::column()
            .push(widget::vertical_space().height(Length::Fill))
            .push(self.build_control_cards())
            .push(capture_row)
            .spacing(ui::CARD_SPACING)
            .padding(spacing.space_s)
            .width(Length::Fill)
            .height(Length::Fill);

        black_backdrop(
            cosmic::iced::widget::stack![camera_preview, controls]
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
        )
    }

    /// Latest frame, or a placeholder until the first frame arrives
    fn build_camera_preview(&self) -> Element<'_, Message> {
        let Some(handle) = &self.session.live.handle else {
            return widget::container(
                widget::text(fl!("camera-starting"))
                    .size(14)
                    .class(cosmic::theme::Text::Color(Color::WHITE)),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .center(Length::Fill)
            .into();
        };

        widget::image::Image::new(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

/// Blocking full-window message shown until camera access is granted
fn permission_screen<'a>(title: String, detail: Option<String>) -> Element<'a, Message> {
    let spacing = cosmic::theme::spacing();

    let mut column = widget::column()
        .push(icon::from_name("camera-disabled-symbolic").size(64))
        .push(widget::text::title3(title))
        .spacing(spacing.space_s)
        .align_x(Alignment::Center);

    if let Some(detail) = detail {
        column = column.push(widget::text::caption(detail));
    }

    widget::container(column)
        .width(Length::Fill)
        .height(Length::Fill)
        .center(Length::Fill)
        .into()
}

fn black_backdrop(content: Element<'_, Message>) -> Element<'_, Message> {
    widget::container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_theme| widget::container::Style {
            background: Some(Background::Color(Color::BLACK)),
            ..Default::default()
        })
        .into()
}
