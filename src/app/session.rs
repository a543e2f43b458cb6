// SPDX-License-Identifier: GPL-3.0-only

//! Session state of the camera screen
//!
//! Everything here is plain data with no widgets or pipelines attached, so
//! the rules for binding, recording and the photo thumbnail can be checked
//! without a display or camera.

use crate::backends::camera::types::{CameraDevice, CameraFrame, Facing};
use crate::constants::timing;
use crate::errors::CameraError;
use crate::fl;
use crate::flash::FlashMode;
use crate::permissions::CameraPermission;
use cosmic::widget::image::Handle;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::oneshot;
use tracing::{debug, info};

/// Recording state machine
///
/// Either recording or not; the stop channel is consumed on stop.
#[derive(Debug, Default)]
pub enum RecordingState {
    #[default]
    Idle,
    Recording {
        /// When recording started
        start_time: Instant,
        /// Output file path
        file_path: PathBuf,
        /// Channel to signal stop
        stop_sender: Option<oneshot::Sender<()>>,
    },
}

impl RecordingState {
    pub fn is_recording(&self) -> bool {
        matches!(self, RecordingState::Recording { .. })
    }

    pub fn file_path(&self) -> Option<&Path> {
        match self {
            RecordingState::Idle => None,
            RecordingState::Recording { file_path, .. } => Some(file_path),
        }
    }

    /// Elapsed recording time in whole seconds
    pub fn elapsed_secs(&self) -> u64 {
        match self {
            RecordingState::Idle => 0,
            RecordingState::Recording { start_time, .. } => start_time.elapsed().as_secs(),
        }
    }

    pub fn take_stop_sender(&mut self) -> Option<oneshot::Sender<()>> {
        match self {
            RecordingState::Idle => None,
            RecordingState::Recording { stop_sender, .. } => stop_sender.take(),
        }
    }
}

/// Inputs the camera session is bound with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingRequest {
    pub facing: Facing,
    pub flash: FlashMode,
}

/// The last saved photo, shown as a thumbnail for a short while
#[derive(Debug, Clone)]
pub struct PhotoPreview {
    pub path: PathBuf,
    /// Decoded thumbnail, filled in once decoding finishes
    pub thumbnail: Option<Handle>,
    pub generation: u64,
    pub shown_at: Instant,
}

/// Latest frame of the bound session
#[derive(Debug, Default)]
pub struct LivePreview {
    /// Source of photo captures
    pub frame: Option<Arc<CameraFrame>>,
    /// The same frame, ready for display
    pub handle: Option<Handle>,
}

impl LivePreview {
    pub fn show(&mut self, frame: Arc<CameraFrame>) {
        self.handle = Some(Handle::from_rgba(
            frame.width,
            frame.height,
            frame.data.to_vec(),
        ));
        self.frame = Some(frame);
    }

    pub fn clear(&mut self) {
        self.frame = None;
        self.handle = None;
    }

    pub fn width(&self) -> Option<u32> {
        self.frame.as_ref().map(|frame| frame.width)
    }
}

/// What the thumbnail card shows
#[derive(Debug, Clone)]
pub enum ThumbnailContent {
    /// No photo inside its display window
    Hidden,
    /// A photo was saved but its thumbnail is not decoded (yet)
    Placeholder,
    Image(Handle),
}

/// Outcome shown to the user as a toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    PhotoSaved(PathBuf),
    PhotoFailed(String),
    VideoSaved(PathBuf),
    /// Saved, but no microphone was recorded
    VideoSavedSilent(PathBuf),
    VideoFailed(String),
    CameraUnavailable(String),
    /// Torch or flash requested without a usable LED
    NoFlash(Option<String>),
}

impl Notice {
    /// Localized toast text
    pub fn message(&self) -> String {
        match self {
            Notice::PhotoSaved(_) => fl!("toast-photo-saved"),
            Notice::PhotoFailed(error) => fl!("toast-photo-failed", error = error.as_str()),
            Notice::VideoSaved(_) => fl!("toast-video-saved"),
            Notice::VideoSavedSilent(_) => fl!("toast-video-saved-silent"),
            Notice::VideoFailed(error) => fl!("toast-video-failed", error = error.as_str()),
            Notice::CameraUnavailable(error) => {
                fl!("toast-camera-unavailable", error = error.as_str())
            }
            Notice::NoFlash(None) => fl!("toast-no-flash"),
            Notice::NoFlash(Some(hint)) => fl!("toast-no-flash-permission", hint = hint.as_str()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Notice::PhotoFailed(_)
                | Notice::VideoFailed(_)
                | Notice::CameraUnavailable(_)
                | Notice::NoFlash(_)
        )
    }
}

/// Everything the screen remembers between messages
#[derive(Debug, Default)]
pub struct SessionState {
    pub permission: CameraPermission,
    pub facing: Facing,
    pub flash: FlashMode,
    pub torch: bool,
    pub recording: RecordingState,
    pub photo_preview: Option<PhotoPreview>,
    pub live: LivePreview,
    /// Camera provider acquired and cameras enumerated
    pub provider_ready: bool,
    /// A photo is being taken or saved
    pub capture_in_flight: bool,
    preview_generation: u64,
}

impl SessionState {
    /// What the session binder should bind, or `None` when it must stay idle
    ///
    /// Without permission, or before the provider is ready, nothing is bound.
    pub fn binding(&self) -> Option<BindingRequest> {
        if !self.permission.is_granted() || !self.provider_ready {
            return None;
        }
        Some(BindingRequest {
            facing: self.facing,
            flash: self.flash,
        })
    }

    /// Switch cameras; the old session's recording and frames go with it
    pub fn toggle_facing(&mut self) -> Facing {
        self.release_session();
        self.facing = self.facing.toggled();
        info!(facing = %self.facing, "Camera selection toggled");
        self.facing
    }

    /// Flip the flash mode, which rebinds the session like a camera switch
    pub fn toggle_flash(&mut self) -> FlashMode {
        self.release_session();
        self.flash = self.flash.toggled();
        info!(flash = ?self.flash, "Flash mode toggled");
        self.flash
    }

    pub fn toggle_torch(&mut self) -> bool {
        self.torch = !self.torch;
        info!(torch = self.torch, "Torch toggled");
        self.torch
    }

    /// Claim the capture slot; `false` means the press is ignored
    pub fn begin_capture(&mut self) -> bool {
        if self.capture_in_flight || self.binding().is_none() {
            debug!(in_flight = self.capture_in_flight, "Capture ignored");
            return false;
        }
        self.capture_in_flight = true;
        true
    }

    /// Release the capture slot and turn the save result into a notice
    ///
    /// A saved photo becomes the visible thumbnail; the returned generation
    /// identifies it for the expiry timer.
    pub fn finish_capture(
        &mut self,
        result: Result<PathBuf, String>,
        now: Instant,
    ) -> (Notice, Option<u64>) {
        self.capture_in_flight = false;
        match result {
            Ok(path) => {
                let generation = self.show_photo_at(path.clone(), now);
                (Notice::PhotoSaved(path), Some(generation))
            }
            Err(error) => (Notice::PhotoFailed(error), None),
        }
    }

    /// Camera a new recording would read from
    ///
    /// `Err(None)` means the press is ignored because nothing may be bound.
    /// `Err(Some(_))` means a session is wanted but no camera is bound yet.
    pub fn recording_source(
        &self,
        bound: Option<&CameraDevice>,
    ) -> Result<CameraDevice, Option<Notice>> {
        if self.binding().is_none() {
            return Err(None);
        }
        bound.cloned().ok_or_else(|| {
            let error = CameraError::NoDeviceForSelection(self.facing.to_string());
            Some(Notice::CameraUnavailable(error.to_string()))
        })
    }

    /// Start tracking a recording; refused while one is active
    pub fn start_recording(&mut self, file_path: PathBuf, stop_sender: oneshot::Sender<()>) -> bool {
        if self.recording.is_recording() {
            return false;
        }
        info!(path = %file_path.display(), "Recording started");
        self.recording = RecordingState::Recording {
            start_time: Instant::now(),
            file_path,
            stop_sender: Some(stop_sender),
        };
        true
    }

    /// Signal the recorder to stop and forget it right away
    ///
    /// The finalize result arrives later through [`SessionState::finish_recording`].
    pub fn stop_recording(&mut self) -> bool {
        let Some(sender) = self.recording.take_stop_sender() else {
            return false;
        };
        if sender.send(()).is_err() {
            debug!("Recorder already finished before stop was requested");
        }
        self.recording = RecordingState::Idle;
        info!("Stop signal sent to recorder");
        true
    }

    /// Let go of everything tied to the bound session before it is unbound
    ///
    /// Stops a running recording and drops the last frame. Returns whether a
    /// recording was running.
    pub fn release_session(&mut self) -> bool {
        self.live.clear();
        if !self.recording.is_recording() {
            return false;
        }
        info!("Session rebinding, stopping active recording");
        self.stop_recording()
    }

    /// Handle a finalized recording
    ///
    /// Clears the handle when the recording ended by itself; a newer
    /// recording started in the meantime is left alone.
    pub fn finish_recording(
        &mut self,
        file_path: &Path,
        result: Result<bool, String>,
    ) -> Notice {
        if self.recording.file_path() == Some(file_path) {
            self.recording = RecordingState::Idle;
        }
        match result {
            Ok(true) => Notice::VideoSaved(file_path.to_path_buf()),
            Ok(false) => Notice::VideoSavedSilent(file_path.to_path_buf()),
            Err(error) => Notice::VideoFailed(error),
        }
    }

    /// Make `path` the visible thumbnail, restarting the display window
    pub fn show_photo_at(&mut self, path: PathBuf, now: Instant) -> u64 {
        self.preview_generation += 1;
        self.photo_preview = Some(PhotoPreview {
            path,
            thumbnail: None,
            generation: self.preview_generation,
            shown_at: now,
        });
        self.preview_generation
    }

    /// Attach a decoded thumbnail if its photo is still the one shown
    pub fn set_thumbnail(&mut self, generation: u64, handle: Handle) {
        if let Some(preview) = self.photo_preview.as_mut()
            && preview.generation == generation
        {
            preview.thumbnail = Some(handle);
        }
    }

    /// Hide the thumbnail of `generation` once its display window has passed
    ///
    /// Returns whether the thumbnail was cleared. A timer belonging to an
    /// older photo never clears a newer one.
    pub fn expire_photo(&mut self, generation: u64, now: Instant) -> bool {
        let expired = self.photo_preview.as_ref().is_some_and(|preview| {
            preview.generation == generation
                && now.saturating_duration_since(preview.shown_at) >= timing::THUMBNAIL_DISPLAY
        });
        if expired {
            debug!(generation, "Thumbnail expired");
            self.photo_preview = None;
        }
        expired
    }

    pub fn photo_visible(&self) -> bool {
        self.photo_preview.is_some()
    }

    /// Thumbnail card content; a saved photo is shown even if decoding failed
    pub fn thumbnail_content(&self) -> ThumbnailContent {
        match &self.photo_preview {
            None => ThumbnailContent::Hidden,
            Some(PhotoPreview {
                thumbnail: Some(handle),
                ..
            }) => ThumbnailContent::Image(handle.clone()),
            Some(_) => ThumbnailContent::Placeholder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PermissionError;
    use std::time::Duration;

    fn granted() -> SessionState {
        SessionState {
            permission: CameraPermission::Granted,
            provider_ready: true,
            ..Default::default()
        }
    }

    #[test]
    fn pending_permission_binds_nothing() {
        let state = SessionState {
            provider_ready: true,
            ..Default::default()
        };
        assert_eq!(state.binding(), None);
    }

    #[test]
    fn binding_waits_for_provider() {
        let mut state = granted();
        state.provider_ready = false;
        assert_eq!(state.binding(), None);
        state.provider_ready = true;
        assert_eq!(
            state.binding(),
            Some(BindingRequest {
                facing: Facing::Back,
                flash: FlashMode::Off,
            })
        );
    }

    #[test]
    fn denied_blocks_capture() {
        let mut state = SessionState {
            permission: CameraPermission::Denied(PermissionError::Denied),
            provider_ready: true,
            ..Default::default()
        };
        assert!(!state.begin_capture());
    }

    #[test]
    fn capture_presses_are_not_queued() {
        let mut state = granted();
        assert!(state.begin_capture());
        assert!(!state.begin_capture());
        let (notice, _) = state.finish_capture(Err("disk full".into()), Instant::now());
        assert_eq!(notice, Notice::PhotoFailed("disk full".into()));
        assert!(state.begin_capture());
    }

    #[test]
    fn failed_capture_shows_no_thumbnail() {
        let mut state = granted();
        state.begin_capture();
        let (_, generation) = state.finish_capture(Err("boom".into()), Instant::now());
        assert!(generation.is_none());
        assert!(!state.photo_visible());
    }

    #[test]
    fn stale_expiry_keeps_newer_photo() {
        let mut state = granted();
        let start = Instant::now();
        let first = state.show_photo_at(PathBuf::from("a.jpg"), start);
        let second = state.show_photo_at(PathBuf::from("b.jpg"), start + Duration::from_secs(2));

        assert!(!state.expire_photo(first, start + Duration::from_secs(3)));
        assert!(state.photo_visible());
        assert!(!state.expire_photo(second, start + Duration::from_secs(4)));
        assert!(state.expire_photo(second, start + Duration::from_secs(5)));
    }

    #[test]
    fn thumbnail_for_replaced_photo_is_dropped() {
        let mut state = granted();
        let now = Instant::now();
        let old = state.show_photo_at(PathBuf::from("a.jpg"), now);
        state.show_photo_at(PathBuf::from("b.jpg"), now);
        state.set_thumbnail(old, Handle::from_rgba(1, 1, vec![0u8; 4]));
        assert!(state.photo_preview.as_ref().is_some_and(|p| p.thumbnail.is_none()));
    }

    #[test]
    fn undecoded_thumbnail_still_shows_card() {
        let mut state = granted();
        let now = Instant::now();
        assert!(matches!(state.thumbnail_content(), ThumbnailContent::Hidden));

        let generation = state.show_photo_at(PathBuf::from("a.jpg"), now);
        assert!(matches!(state.thumbnail_content(), ThumbnailContent::Placeholder));

        state.set_thumbnail(generation, Handle::from_rgba(1, 1, vec![0u8; 4]));
        assert!(matches!(state.thumbnail_content(), ThumbnailContent::Image(_)));

        state.expire_photo(generation, now + timing::THUMBNAIL_DISPLAY);
        assert!(matches!(state.thumbnail_content(), ThumbnailContent::Hidden));
    }

    #[test]
    fn finish_of_old_recording_keeps_new_one() {
        let mut state = granted();
        let (tx, _rx) = oneshot::channel();
        state.start_recording(PathBuf::from("VID_a.mp4"), tx);
        state.stop_recording();

        let (tx, _rx2) = oneshot::channel();
        state.start_recording(PathBuf::from("VID_b.mp4"), tx);
        state.finish_recording(Path::new("VID_a.mp4"), Ok(true));
        assert!(state.recording.is_recording());
    }

    #[test]
    fn camera_switch_stops_recording() {
        let mut state = granted();
        let (tx, mut rx) = oneshot::channel();
        state.start_recording(PathBuf::from("VID_a.mp4"), tx);

        state.toggle_facing();
        assert!(!state.recording.is_recording());
        assert!(rx.try_recv().is_ok());

        let notice = state.finish_recording(Path::new("VID_a.mp4"), Ok(true));
        assert_eq!(notice, Notice::VideoSaved(PathBuf::from("VID_a.mp4")));
    }

    #[test]
    fn flash_toggle_stops_recording() {
        let mut state = granted();
        let (tx, _rx) = oneshot::channel();
        state.start_recording(PathBuf::from("VID_a.mp4"), tx);
        state.toggle_flash();
        assert!(!state.recording.is_recording());
        assert!(!state.release_session());
    }

    #[test]
    fn camera_switch_drops_old_frames() {
        let mut state = granted();
        let frame = CameraFrame {
            width: 2,
            height: 1,
            data: Arc::from(vec![0u8; 8]),
            mirrored: false,
            captured_at: Instant::now(),
        };
        state.live.show(Arc::new(frame));
        assert_eq!(state.live.width(), Some(2));
        assert!(state.live.handle.is_some());

        state.toggle_facing();
        assert!(state.live.frame.is_none());
        assert!(state.live.handle.is_none());
    }

    #[test]
    fn torch_toggle_keeps_recording() {
        let mut state = granted();
        let (tx, _rx) = oneshot::channel();
        state.start_recording(PathBuf::from("VID_a.mp4"), tx);
        state.toggle_torch();
        assert!(state.recording.is_recording());
    }

    #[test]
    fn record_without_bound_camera_is_reported() {
        let state = granted();
        assert!(matches!(
            state.recording_source(None),
            Err(Some(Notice::CameraUnavailable(_)))
        ));

        let device = CameraDevice::default_camera();
        assert_eq!(
            state.recording_source(Some(&device)).map(|d| d.path),
            Ok(device.path.clone())
        );

        let denied = SessionState {
            permission: CameraPermission::Denied(PermissionError::Denied),
            ..Default::default()
        };
        assert!(matches!(denied.recording_source(Some(&device)), Err(None)));
    }

    #[test]
    fn self_ended_recording_clears_handle() {
        let mut state = granted();
        let (tx, _rx) = oneshot::channel();
        state.start_recording(PathBuf::from("VID_a.mp4"), tx);
        let notice = state.finish_recording(Path::new("VID_a.mp4"), Err("encoder died".into()));
        assert_eq!(notice, Notice::VideoFailed("encoder died".into()));
        assert!(!state.recording.is_recording());
    }

    #[test]
    fn error_notices_are_flagged() {
        assert!(Notice::NoFlash(None).is_error());
        assert!(!Notice::VideoSavedSilent(PathBuf::new()).is_error());
    }
}
