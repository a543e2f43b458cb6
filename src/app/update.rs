// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The `update()` function is a dispatcher; the handling code lives in the
//! `handlers` submodules:
//!
//! - `handlers::camera`: Permission, provider, session binding, frames, switch/flash/torch
//! - `handlers::capture`: Photo capture, thumbnail, video recording
//! - `handlers::system`: Settings, context drawer, URLs, toasts

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== Startup =====
            Message::PermissionResolved(result) => self.handle_permission_resolved(result),
            Message::ProviderReady(result) => self.handle_provider_ready(result),

            // ===== Camera Session =====
            Message::SessionBound(device) => self.handle_session_bound(device),
            Message::BindFailed(error) => self.handle_bind_failed(error),
            Message::CameraFrame(frame) => self.handle_camera_frame(frame),

            // ===== Controls =====
            Message::SwitchCamera => self.handle_switch_camera(),
            Message::ToggleFlash => self.handle_toggle_flash(),
            Message::ToggleTorch => self.handle_toggle_torch(),
            Message::Capture => self.handle_capture(),
            Message::FlashComplete => self.handle_flash_complete(),
            Message::ToggleRecording => self.handle_toggle_recording(),
            Message::UpdateRecordingDuration => self.handle_update_recording_duration(),

            // ===== Completions =====
            Message::PhotoSaved(result) => self.handle_photo_saved(result),
            Message::ThumbnailLoaded(generation, handle) => {
                self.handle_thumbnail_loaded(generation, handle)
            }
            Message::ExpireThumbnail(generation) => self.handle_expire_thumbnail(generation),
            Message::RecordingStopped(path, result) => self.handle_recording_stopped(path, result),

            // ===== Settings & System =====
            Message::UpdateConfig(config) => self.handle_update_config(config),
            Message::SelectTheme(index) => self.handle_select_theme(index),
            Message::ToggleMirrorPreview => self.handle_toggle_mirror_preview(),
            Message::SelectJpegQuality(index) => self.handle_select_jpeg_quality(index),
            Message::SelectBitratePreset(index) => self.handle_select_bitrate_preset(index),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::CloseToast(id) => {
                self.toasts.remove(id);
                Task::none()
            }
        }
    }
}
