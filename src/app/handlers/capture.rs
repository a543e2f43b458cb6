// SPDX-License-Identifier: GPL-3.0-only

//! Capture operations handlers
//!
//! Handles photo capture with its pre-flash, the last-photo thumbnail, and
//! toggled video recording.

use crate::app::session::Notice;
use crate::app::state::{AppModel, Message};
use crate::constants::{media, timing};
use crate::errors::PhotoError;
use crate::flash;
use crate::pipelines::photo::PhotoPipeline;
use crate::pipelines::video::VideoRecorder;
use crate::storage::{self, MediaKind};
use cosmic::Task;
use cosmic::widget::image::Handle;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

impl AppModel {
    /// Create a delayed task that sends a message after `delay`
    pub(crate) fn delay_task(delay: Duration, message: Message) -> Task<cosmic::Action<Message>> {
        Task::perform(
            async move {
                tokio::time::sleep(delay).await;
                message
            },
            cosmic::Action::App,
        )
    }

    // =========================================================================
    // Photo Handlers
    // =========================================================================

    pub(crate) fn handle_capture(&mut self) -> Task<cosmic::Action<Message>> {
        if !self.session.begin_capture() {
            return Task::none();
        }

        if self.session.flash.is_on() {
            if self.flash_hardware.has_devices() {
                info!("Flash on - firing LED before capture");
                flash::all_on(&self.flash_hardware.devices);
            } else {
                info!("Flash on - showing screen flash before capture");
                self.flash_active = true;
            }
            return Self::delay_task(timing::PRE_FLASH, Message::FlashComplete);
        }

        self.capture_photo()
    }

    pub(crate) fn handle_flash_complete(&mut self) -> Task<cosmic::Action<Message>> {
        info!("Flash complete - capturing photo");
        self.flash_active = false;
        // Take the frame before the LED goes back to the torch state
        let task = self.capture_photo();
        if self.flash_hardware.has_devices() {
            self.flash_hardware.set_torch(self.session.torch);
        }
        task
    }

    /// Encode the latest preview frame into `IMG_<timestamp>.jpg`
    fn capture_photo(&mut self) -> Task<cosmic::Action<Message>> {
        let Some(frame) = self.session.live.frame.clone() else {
            warn!("No frame available for capture");
            return self.handle_photo_saved(Err(PhotoError::NoFrameAvailable.to_string()));
        };

        let path = match storage::next_output_path(MediaKind::Photo) {
            Ok(path) => path,
            Err(e) => {
                error!(error = %e, "Cannot prepare photo directory");
                let error = PhotoError::SaveFailed(e.to_string()).to_string();
                return self.handle_photo_saved(Err(error));
            }
        };

        let pipeline = PhotoPipeline::new(self.config.jpeg_quality);
        info!(path = %path.display(), "Capturing photo");

        Task::perform(
            async move {
                pipeline
                    .capture_and_save(frame.as_ref().clone(), path)
                    .await
                    .map_err(|e| e.to_string())
            },
            |result| cosmic::Action::App(Message::PhotoSaved(result)),
        )
    }

    pub(crate) fn handle_photo_saved(
        &mut self,
        result: Result<PathBuf, String>,
    ) -> Task<cosmic::Action<Message>> {
        match &result {
            Ok(path) => info!(path = %path.display(), "Photo saved successfully"),
            Err(err) => error!(error = %err, "Failed to save photo"),
        }

        let (notice, generation) = self.session.finish_capture(result, Instant::now());
        let toast = self.notify(notice);

        let Some(generation) = generation else {
            return toast;
        };
        let Some(path) = self.session.photo_preview.as_ref().map(|p| p.path.clone()) else {
            return toast;
        };

        let thumbnail_task = Task::perform(storage::load_thumbnail(path), move |handle| {
            cosmic::Action::App(Message::ThumbnailLoaded(generation, handle))
        });
        let expiry_task =
            Self::delay_task(timing::THUMBNAIL_DISPLAY, Message::ExpireThumbnail(generation));

        Task::batch([toast, thumbnail_task, expiry_task])
    }

    pub(crate) fn handle_thumbnail_loaded(
        &mut self,
        generation: u64,
        handle: Option<Handle>,
    ) -> Task<cosmic::Action<Message>> {
        match handle {
            Some(handle) => self.session.set_thumbnail(generation, handle),
            None => warn!(generation, "Thumbnail could not be decoded"),
        }
        Task::none()
    }

    pub(crate) fn handle_expire_thumbnail(
        &mut self,
        generation: u64,
    ) -> Task<cosmic::Action<Message>> {
        self.session.expire_photo(generation, Instant::now());
        Task::none()
    }

    // =========================================================================
    // Recording Handlers
    // =========================================================================

    pub(crate) fn handle_toggle_recording(&mut self) -> Task<cosmic::Action<Message>> {
        if self.session.recording.is_recording() {
            self.session.stop_recording();
            return Task::none();
        }

        let device = match self.session.recording_source(self.active_device.as_ref()) {
            Ok(device) => device,
            Err(None) => return Task::none(),
            Err(Some(notice)) => {
                error!("No bound camera available for recording");
                return self.notify(notice);
            }
        };

        let path = match storage::next_output_path(MediaKind::Video) {
            Ok(path) => path,
            Err(e) => {
                error!(error = %e, "Cannot prepare video directory");
                return self.notify(Notice::VideoFailed(e.to_string()));
            }
        };

        let width = self
            .session
            .live
            .width()
            .unwrap_or(media::FALLBACK_RECORDING_WIDTH);
        let bitrate_kbps = self.config.bitrate_preset.bitrate_kbps(width);

        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel();
        self.session.start_recording(path.clone(), stop_tx);

        let remote = self.remote.clone();
        let recording_path = path.clone();
        let recording_task = Task::perform(
            async move {
                VideoRecorder::record(device, remote, recording_path, bitrate_kbps, stop_rx)
                    .await
                    .map(|outcome| outcome.with_audio)
                    .map_err(|e| e.to_string())
            },
            move |result| cosmic::Action::App(Message::RecordingStopped(path, result)),
        );

        Task::batch([
            recording_task,
            Self::delay_task(Duration::from_secs(1), Message::UpdateRecordingDuration),
        ])
    }

    pub(crate) fn handle_recording_stopped(
        &mut self,
        path: PathBuf,
        result: Result<bool, String>,
    ) -> Task<cosmic::Action<Message>> {
        match &result {
            Ok(with_audio) => {
                info!(path = %path.display(), with_audio, "Recording saved successfully")
            }
            Err(err) => error!(path = %path.display(), error = %err, "Recording failed"),
        }
        let notice = self.session.finish_recording(&path, result);
        self.notify(notice)
    }

    /// Keeps the duration label ticking while recording
    pub(crate) fn handle_update_recording_duration(&mut self) -> Task<cosmic::Action<Message>> {
        if self.session.recording.is_recording() {
            return Self::delay_task(Duration::from_secs(1), Message::UpdateRecordingDuration);
        }
        Task::none()
    }
}
