// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::app::session::SessionState;
use crate::app::settings::SettingsOptions;
use crate::backends::camera::types::{CameraDevice, CameraFrame};
use crate::config::Config;
use crate::errors::PermissionError;
use crate::flash::FlashHardware;
use crate::permissions::PipeWireRemote;
use cosmic::cosmic_config;
use cosmic::widget::about::About;
use cosmic::widget::image::Handle;
use cosmic::widget::toaster::{ToastId, Toasts};
use std::path::PathBuf;
use std::sync::Arc;

/// The application model stores app-specific state used to describe its interface and
/// drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// The about page for this app.
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Configuration handler for saving settings
    pub config_handler: Option<cosmic_config::Config>,
    /// Labels for the settings dropdowns
    pub settings_options: SettingsOptions,
    /// Permission, selection, recording and thumbnail state
    pub session: SessionState,
    /// Transient notifications
    pub toasts: Toasts<Message>,
    /// PipeWire remote granted by the camera portal
    pub remote: Option<PipeWireRemote>,
    /// Cameras known to the provider
    pub cameras: Vec<CameraDevice>,
    /// Device the current session is bound to
    pub active_device: Option<CameraDevice>,
    /// Flash LEDs found at startup
    pub flash_hardware: FlashHardware,
    /// Screen flash is showing (white overlay, no LED available)
    pub flash_active: bool,
    /// The missing flash LED has been reported already
    pub flash_warned: bool,
    /// A bind failure has been reported for the current selection
    pub bind_error_shown: bool,
}

/// The context page to display in the context drawer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
    Settings,
}

/// Messages emitted by the application and its widgets.
///
/// - **Startup**: permission and provider results
/// - **Camera Session**: binding results and preview frames
/// - **Controls**: switch, flash, torch, capture, record
/// - **Completions**: photo saved, thumbnail decoded and expired, recording finalized
/// - **Settings & System**: configuration, drawer, external URLs, toasts
#[derive(Debug, Clone)]
pub enum Message {
    // ===== Startup =====
    /// Portal answered the camera access request
    PermissionResolved(Result<Option<PipeWireRemote>, PermissionError>),
    /// Camera provider acquired; carries the enumerated cameras
    ProviderReady(Result<Vec<CameraDevice>, String>),

    // ===== Camera Session =====
    /// Session bound to a device
    SessionBound(CameraDevice),
    /// Session could not be bound
    BindFailed(String),
    /// New camera frame received from pipeline
    CameraFrame(Arc<CameraFrame>),

    // ===== Controls =====
    /// Flip between the back and front camera
    SwitchCamera,
    /// Toggle flash for the next capture
    ToggleFlash,
    /// Toggle the torch LED
    ToggleTorch,
    /// Capture photo
    Capture,
    /// Pre-flash window elapsed, take the photo now
    FlashComplete,
    /// Start or stop video recording
    ToggleRecording,
    /// Refresh the recording duration label
    UpdateRecordingDuration,

    // ===== Completions =====
    /// Photo pipeline finished with the saved path or an error
    PhotoSaved(Result<PathBuf, String>),
    /// Thumbnail decoded for the photo of the given generation
    ThumbnailLoaded(u64, Option<Handle>),
    /// Display window of the thumbnail with the given generation elapsed
    ExpireThumbnail(u64),
    /// Recording at the path finalized; `Ok(true)` when it has audio
    RecordingStopped(PathBuf, Result<bool, String>),

    // ===== Settings & System =====
    /// Configuration updated
    UpdateConfig(Config),
    /// Select application theme by index
    SelectTheme(usize),
    /// Toggle mirroring of the front camera preview
    ToggleMirrorPreview,
    /// Select JPEG quality by index
    SelectJpegQuality(usize),
    /// Select bitrate preset by index
    SelectBitratePreset(usize),
    /// Toggle context drawer page (About, Settings)
    ToggleContextPage(ContextPage),
    /// Open external URL (repository, etc.)
    LaunchUrl(String),
    /// Dismiss a toast
    CloseToast(ToastId),
}
