// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the camera application
//!
//! Each concern has its own enum; UI-facing messages come from `Display`.

use std::fmt;

/// Camera-specific errors
#[derive(Debug, Clone)]
pub enum CameraError {
    /// No camera devices found
    NoCameraFound,
    /// The requested camera selection has no device
    NoDeviceForSelection(String),
    /// Binding the preview session failed
    BindFailed(String),
}

/// Recording-specific errors
#[derive(Debug, Clone)]
pub enum RecordingError {
    /// Failed to build or start the recording pipeline
    StartFailed(String),
    /// Failed to finalize the output file
    StopFailed(String),
    /// No usable encoder or muxer installed
    EncoderNotAvailable(String),
    /// Pipeline reported an error while recording
    PipelineError(String),
    /// The recording task went away before finalizing
    Aborted,
}

/// Photo capture errors
#[derive(Debug, Clone)]
pub enum PhotoError {
    /// No frame available for capture
    NoFrameAvailable,
    /// Encoding failed
    EncodingFailed(String),
    /// Save failed
    SaveFailed(String),
}

/// Camera permission errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    /// The user refused access
    Denied,
    /// The request dialog was dismissed
    Cancelled,
    /// The portal is unreachable from inside a sandbox
    PortalUnavailable(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoCameraFound => write!(f, "No camera devices found"),
            CameraError::NoDeviceForSelection(which) => {
                write!(f, "No camera available for {} selection", which)
            }
            CameraError::BindFailed(msg) => write!(f, "Failed to bind camera: {}", msg),
        }
    }
}

impl fmt::Display for RecordingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordingError::StartFailed(msg) => write!(f, "Failed to start recording: {}", msg),
            RecordingError::StopFailed(msg) => write!(f, "Failed to stop recording: {}", msg),
            RecordingError::EncoderNotAvailable(msg) => write!(f, "Encoder not available: {}", msg),
            RecordingError::PipelineError(msg) => write!(f, "Pipeline error: {}", msg),
            RecordingError::Aborted => write!(f, "Recording aborted"),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::NoFrameAvailable => write!(f, "No frame available for capture"),
            PhotoError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            PhotoError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl fmt::Display for PermissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionError::Denied => write!(f, "Camera access denied"),
            PermissionError::Cancelled => write!(f, "Camera access request cancelled"),
            PermissionError::PortalUnavailable(msg) => {
                write!(f, "Camera portal unavailable: {}", msg)
            }
        }
    }
}

impl std::error::Error for CameraError {}
impl std::error::Error for RecordingError {}
impl std::error::Error for PhotoError {}
impl std::error::Error for PermissionError {}

impl From<std::io::Error> for PhotoError {
    fn from(err: std::io::Error) -> Self {
        PhotoError::SaveFailed(err.to_string())
    }
}

impl From<image::ImageError> for PhotoError {
    fn from(err: image::ImageError) -> Self {
        PhotoError::EncodingFailed(err.to_string())
    }
}

impl From<gstreamer::glib::Error> for RecordingError {
    fn from(err: gstreamer::glib::Error) -> Self {
        RecordingError::StartFailed(err.to_string())
    }
}

impl From<gstreamer::glib::BoolError> for RecordingError {
    fn from(err: gstreamer::glib::BoolError) -> Self {
        RecordingError::StartFailed(err.to_string())
    }
}
