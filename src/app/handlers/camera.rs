// SPDX-License-Identifier: GPL-3.0-only

//! Camera control handlers
//!
//! Handles the permission result, provider acquisition, session binding,
//! preview frames, and the switch, flash and torch controls.

use crate::app::session::Notice;
use crate::app::state::{AppModel, Message};
use crate::backends::camera::camera_provider;
use crate::backends::camera::types::{CameraDevice, CameraFrame};
use crate::errors::{CameraError, PermissionError};
use crate::flash::FlashMode;
use crate::permissions::{CameraPermission, PipeWireRemote};
use cosmic::Task;
use std::sync::Arc;
use tracing::{error, info, warn};

impl AppModel {
    // =========================================================================
    // Startup Handlers
    // =========================================================================

    pub(crate) fn handle_permission_resolved(
        &mut self,
        result: Result<Option<PipeWireRemote>, PermissionError>,
    ) -> Task<cosmic::Action<Message>> {
        let remote = match result {
            Ok(remote) => remote,
            Err(reason) => {
                warn!(%reason, "Camera permission denied, camera UI stays blocked");
                self.session.permission = CameraPermission::Denied(reason);
                return Task::none();
            }
        };

        info!(portal = remote.is_some(), "Camera permission granted");
        self.session.permission = CameraPermission::Granted;
        self.remote = remote.clone();

        Task::perform(
            async move {
                let provider = camera_provider(remote).await.map_err(|e| e.to_string())?;
                tokio::task::spawn_blocking(move || provider.enumerate_cameras())
                    .await
                    .map_err(|e| e.to_string())?
                    .map_err(|e| CameraError::from(e).to_string())
            },
            |result| cosmic::Action::App(Message::ProviderReady(result)),
        )
    }

    pub(crate) fn handle_provider_ready(
        &mut self,
        result: Result<Vec<CameraDevice>, String>,
    ) -> Task<cosmic::Action<Message>> {
        match result {
            Ok(cameras) => {
                for camera in &cameras {
                    info!(name = %camera.name, location = %camera.location, rotation = %camera.rotation, "Camera available");
                }
                self.cameras = cameras;
                self.session.provider_ready = true;
                Task::none()
            }
            Err(error) => {
                error!(%error, "Camera provider unavailable");
                self.notify(Notice::CameraUnavailable(error))
            }
        }
    }

    // =========================================================================
    // Session Handlers
    // =========================================================================

    pub(crate) fn handle_session_bound(
        &mut self,
        device: CameraDevice,
    ) -> Task<cosmic::Action<Message>> {
        info!(name = %device.name, path = %device.path, "Preview session active");
        self.active_device = Some(device);
        self.bind_error_shown = false;
        Task::none()
    }

    /// Reported once per selection; the binder keeps retrying quietly
    pub(crate) fn handle_bind_failed(&mut self, error: String) -> Task<cosmic::Action<Message>> {
        self.active_device = None;
        if self.bind_error_shown {
            return Task::none();
        }
        self.bind_error_shown = true;
        self.notify(Notice::CameraUnavailable(error))
    }

    pub(crate) fn handle_camera_frame(
        &mut self,
        frame: Arc<CameraFrame>,
    ) -> Task<cosmic::Action<Message>> {
        self.session.live.show(frame);
        Task::none()
    }

    // =========================================================================
    // Control Handlers
    // =========================================================================

    pub(crate) fn handle_switch_camera(&mut self) -> Task<cosmic::Action<Message>> {
        let facing = self.session.toggle_facing();
        info!(%facing, cameras = self.cameras.len(), "Switching camera");
        if self.cameras.len() < 2 {
            info!("Single camera, both selections use it");
        }
        self.bind_error_shown = false;
        Task::none()
    }

    pub(crate) fn handle_toggle_flash(&mut self) -> Task<cosmic::Action<Message>> {
        let mode = self.session.toggle_flash();
        if mode == FlashMode::On && !self.flash_hardware.has_devices() {
            info!("No flash LED, screen flash will be used");
            return self.warn_no_flash();
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_torch(&mut self) -> Task<cosmic::Action<Message>> {
        let on = self.session.toggle_torch();
        if self.flash_hardware.has_devices() {
            self.flash_hardware.set_torch(on);
            return Task::none();
        }
        warn!(torch = on, "Torch toggled without a controllable LED");
        if on {
            return self.warn_no_flash();
        }
        Task::none()
    }

    /// Tell the user once that no flash LED can be driven
    fn warn_no_flash(&mut self) -> Task<cosmic::Action<Message>> {
        if self.flash_warned {
            return Task::none();
        }
        self.flash_warned = true;
        let hint = self.flash_hardware.permission_error.clone();
        self.notify(Notice::NoFlash(hint))
    }
}
