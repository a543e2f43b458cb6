// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for camera backends

use std::sync::Arc;
use std::time::Instant;

/// Which way the selected camera faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Facing {
    Front,
    #[default]
    Back,
}

impl Facing {
    /// The other selection; toggling twice returns the original value
    pub fn toggled(self) -> Self {
        match self {
            Facing::Front => Facing::Back,
            Facing::Back => Facing::Front,
        }
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Facing::Front => write!(f, "front"),
            Facing::Back => write!(f, "back"),
        }
    }
}

impl std::str::FromStr for Facing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" | "user" | "selfie" => Ok(Facing::Front),
            "back" | "rear" | "environment" => Ok(Facing::Back),
            other => Err(format!("unknown camera selection '{}'", other)),
        }
    }
}

/// Physical mounting reported by libcamera (`api.libcamera.location`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraLocation {
    Front,
    Back,
    External,
    #[default]
    Unknown,
}

impl CameraLocation {
    pub fn from_property(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "front" => CameraLocation::Front,
            "back" => CameraLocation::Back,
            "external" => CameraLocation::External,
            _ => CameraLocation::Unknown,
        }
    }

    /// The selection this location satisfies directly, if any
    pub fn facing(&self) -> Option<Facing> {
        match self {
            CameraLocation::Front => Some(Facing::Front),
            CameraLocation::Back => Some(Facing::Back),
            CameraLocation::External | CameraLocation::Unknown => None,
        }
    }
}

impl std::fmt::Display for CameraLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraLocation::Front => write!(f, "front"),
            CameraLocation::Back => write!(f, "back"),
            CameraLocation::External => write!(f, "external"),
            CameraLocation::Unknown => write!(f, "unknown"),
        }
    }
}

/// Sensor rotation in degrees (clockwise)
///
/// Phone sensors are commonly mounted at 90° or 270° relative to the display.
/// The value comes from libcamera's `api.libcamera.rotation` node property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SensorRotation {
    #[default]
    None,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl SensorRotation {
    /// Parse rotation from a degree value, normalised to 0-360
    pub fn from_degrees(degrees: &str) -> Self {
        match degrees.trim().parse::<i32>() {
            Ok(deg) => match deg.rem_euclid(360) {
                90 => SensorRotation::Rotate90,
                180 => SensorRotation::Rotate180,
                270 => SensorRotation::Rotate270,
                _ => SensorRotation::None,
            },
            Err(_) => SensorRotation::None,
        }
    }

    pub fn degrees(&self) -> u32 {
        match self {
            SensorRotation::None => 0,
            SensorRotation::Rotate90 => 90,
            SensorRotation::Rotate180 => 180,
            SensorRotation::Rotate270 => 270,
        }
    }

    /// `videoflip` method that brings a frame from this sensor upright
    pub fn videoflip_method(&self) -> Option<&'static str> {
        match self {
            SensorRotation::None => None,
            SensorRotation::Rotate90 => Some("clockwise"),
            SensorRotation::Rotate180 => Some("rotate-180"),
            SensorRotation::Rotate270 => Some("counterclockwise"),
        }
    }
}

impl std::fmt::Display for SensorRotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Represents a camera device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub name: String,
    /// `pipewire-serial-<serial>`, or empty to let PipeWire pick its default camera
    pub path: String,
    /// PipeWire node id, when known
    pub node_id: Option<String>,
    pub location: CameraLocation,
    pub rotation: SensorRotation,
}

impl CameraDevice {
    /// The camera PipeWire selects when no target is given
    pub fn default_camera() -> Self {
        Self {
            name: "Default Camera".to_string(),
            path: String::new(),
            node_id: None,
            location: CameraLocation::Unknown,
            rotation: SensorRotation::None,
        }
    }

    /// Value for the `target-object` property of `pipewiresrc`
    pub fn target_object(&self) -> Option<&str> {
        if let Some(serial) = self.path.strip_prefix("pipewire-serial-") {
            Some(serial)
        } else {
            self.path.strip_prefix("pipewire-")
        }
    }
}

/// How the preview endpoint presents frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PreviewOptions {
    /// Rotation applied so frames come out upright
    pub rotation: SensorRotation,
    /// Flip horizontally, as a mirror
    pub mirror: bool,
}

/// A single upright, tightly packed RGBA frame from the camera
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    pub data: Arc<[u8]>,
    /// Whether the pixels are horizontally mirrored for display
    pub mirrored: bool,
    /// When the frame left the pipeline (for latency diagnostics)
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Pack a frame whose rows may carry stride padding
    pub fn from_strided(
        width: u32,
        height: u32,
        stride: usize,
        pixels: &[u8],
        mirrored: bool,
    ) -> Option<Self> {
        let row = width as usize * 4;
        if stride < row || pixels.len() < stride * (height as usize).saturating_sub(1) + row {
            return None;
        }

        let data: Arc<[u8]> = if stride == row {
            Arc::from(&pixels[..row * height as usize])
        } else {
            let mut packed = Vec::with_capacity(row * height as usize);
            for line in pixels.chunks(stride).take(height as usize) {
                packed.extend_from_slice(&line[..row]);
            }
            Arc::from(packed)
        };

        Some(Self {
            width,
            height,
            data,
            mirrored,
            captured_at: Instant::now(),
        })
    }
}

/// Frame receiver type for preview streams
pub type FrameReceiver = cosmic::iced::futures::channel::mpsc::Receiver<CameraFrame>;

/// Frame sender type for preview streams
pub type FrameSender = cosmic::iced::futures::channel::mpsc::Sender<CameraFrame>;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// Failed to build or start a pipeline
    InitializationFailed(String),
    /// Camera device not found
    DeviceNotFound(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<BackendError> for crate::errors::CameraError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::DeviceNotFound(_) => crate::errors::CameraError::NoCameraFound,
            other => crate::errors::CameraError::BindFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_toggle_is_an_involution() {
        for facing in [Facing::Front, Facing::Back] {
            assert_ne!(facing.toggled(), facing);
            assert_eq!(facing.toggled().toggled(), facing);
        }
    }

    #[test]
    fn rotation_parses_and_normalises() {
        assert_eq!(SensorRotation::from_degrees("90"), SensorRotation::Rotate90);
        assert_eq!(SensorRotation::from_degrees("-90"), SensorRotation::Rotate270);
        assert_eq!(SensorRotation::from_degrees("540"), SensorRotation::Rotate180);
        assert_eq!(SensorRotation::from_degrees("junk"), SensorRotation::None);
        assert_eq!(SensorRotation::Rotate270.degrees(), 270);
    }

    #[test]
    fn strided_frames_are_packed() {
        // 2x2 RGBA with 4 bytes of padding per row
        let mut pixels = Vec::new();
        for row in 0..2u8 {
            pixels.extend_from_slice(&[row; 8]);
            pixels.extend_from_slice(&[0xEE; 4]);
        }
        let frame = CameraFrame::from_strided(2, 2, 12, &pixels, false).expect("valid frame");
        assert_eq!(frame.data.len(), 16);
        assert!(frame.data.iter().all(|&b| b != 0xEE));
    }

    #[test]
    fn short_buffers_are_rejected() {
        assert!(CameraFrame::from_strided(4, 4, 16, &[0; 10], false).is_none());
    }

    #[test]
    fn target_object_strips_prefixes() {
        let mut device = CameraDevice::default_camera();
        assert_eq!(device.target_object(), None);
        device.path = "pipewire-serial-2146".into();
        assert_eq!(device.target_object(), Some("2146"));
    }
}
