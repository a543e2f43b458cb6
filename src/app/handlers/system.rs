// SPDX-License-Identifier: GPL-3.0-only

//! System handlers
//!
//! Handles settings, the context drawer, external URLs and toasts.

use crate::app::session::Notice;
use crate::app::state::{AppModel, ContextPage, Message};
use crate::backends::camera::types::Facing;
use crate::config::{AppTheme, Config};
use crate::constants::BitratePreset;
use crate::pipelines::photo::EncodingQuality;
use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use cosmic::widget::toaster::Toast;
use tracing::{error, info, warn};

impl AppModel {
    // =========================================================================
    // Notification Handlers
    // =========================================================================

    /// Show `notice` as a toast
    pub(crate) fn notify(&mut self, notice: Notice) -> Task<cosmic::Action<Message>> {
        let text = notice.message();
        if notice.is_error() {
            warn!(%text, "Showing error toast");
        } else {
            info!(%text, "Showing toast");
        }
        self.toasts.push(Toast::new(text)).map(cosmic::Action::App)
    }

    // =========================================================================
    // Settings Handlers
    // =========================================================================

    pub(crate) fn handle_update_config(&mut self, config: Config) -> Task<cosmic::Action<Message>> {
        info!("UpdateConfig received");
        let theme_changed = config.app_theme != self.config.app_theme;
        if config.mirror_preview != self.config.mirror_preview {
            self.release_mirrored_session();
        }
        self.config = config;
        if theme_changed {
            return cosmic::command::set_theme(self.config.app_theme.theme());
        }
        Task::none()
    }

    pub(crate) fn handle_select_theme(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let Some(app_theme) = AppTheme::from_index(index) else {
            return Task::none();
        };

        info!(?app_theme, "Setting application theme");
        self.config.app_theme = app_theme;
        self.save_config("app theme");
        cosmic::command::set_theme(app_theme.theme())
    }

    /// Changing the mirror setting rebinds the front camera session
    pub(crate) fn handle_toggle_mirror_preview(&mut self) -> Task<cosmic::Action<Message>> {
        self.release_mirrored_session();
        self.config.mirror_preview = !self.config.mirror_preview;
        info!(mirror_preview = self.config.mirror_preview, "Mirror preview toggled");
        self.save_config("mirror preview");
        Task::none()
    }

    /// Mirroring only rebinds the front camera session
    fn release_mirrored_session(&mut self) {
        if self.session.facing == Facing::Front {
            self.session.release_session();
        }
    }

    pub(crate) fn handle_select_jpeg_quality(
        &mut self,
        index: usize,
    ) -> Task<cosmic::Action<Message>> {
        let quality = EncodingQuality::from_index(index);
        info!(?quality, "Selected JPEG quality");
        self.config.jpeg_quality = quality;
        self.save_config("JPEG quality");
        Task::none()
    }

    pub(crate) fn handle_select_bitrate_preset(
        &mut self,
        index: usize,
    ) -> Task<cosmic::Action<Message>> {
        if let Some(&preset) = BitratePreset::ALL.get(index) {
            info!(?preset, "Selected bitrate preset");
            self.config.bitrate_preset = preset;
            self.save_config("bitrate preset");
        }
        Task::none()
    }

    fn save_config(&self, setting: &str) {
        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, setting, "Failed to save setting");
        }
    }

    // =========================================================================
    // UI Navigation Handlers
    // =========================================================================

    pub(crate) fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        if let Err(err) = open::that_detached(&url) {
            error!(url = %url, error = %err, "Failed to open URL");
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }
}
