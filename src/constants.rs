// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Video encoder bitrate presets
///
/// These presets define the target bitrate for video encoding based on resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BitratePreset {
    /// Smaller files, reduced quality
    Low,
    /// Balanced quality and file size
    #[default]
    Medium,
    /// Larger files, better quality
    High,
}

impl BitratePreset {
    /// All preset variants, lowest first
    pub const ALL: [BitratePreset; 3] = [
        BitratePreset::Low,
        BitratePreset::Medium,
        BitratePreset::High,
    ];

    /// Position of this preset in [`BitratePreset::ALL`]
    pub fn index(&self) -> usize {
        match self {
            BitratePreset::Low => 0,
            BitratePreset::Medium => 1,
            BitratePreset::High => 2,
        }
    }

    /// Preset at `index` in [`BitratePreset::ALL`], falling back to the default
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }

    /// Target bitrate in kbps for a frame of the given width
    ///
    /// - SD (640x480): Low=1, Medium=2, High=4 Mbps
    /// - HD (1280x720): Low=2.5, Medium=5, High=10 Mbps
    /// - Full HD (1920x1080): Low=4, Medium=8, High=16 Mbps
    /// - 4K (3840x2160): Low=15, Medium=30, High=50 Mbps
    pub fn bitrate_kbps(&self, width: u32) -> u32 {
        match (ResolutionTier::for_width(width), self) {
            (ResolutionTier::SD, BitratePreset::Low) => 1_000,
            (ResolutionTier::SD, BitratePreset::Medium) => 2_000,
            (ResolutionTier::SD, BitratePreset::High) => 4_000,
            (ResolutionTier::HD, BitratePreset::Low) => 2_500,
            (ResolutionTier::HD, BitratePreset::Medium) => 5_000,
            (ResolutionTier::HD, BitratePreset::High) => 10_000,
            (ResolutionTier::FullHD, BitratePreset::Low) => 4_000,
            (ResolutionTier::FullHD, BitratePreset::Medium) => 8_000,
            (ResolutionTier::FullHD, BitratePreset::High) => 16_000,
            (ResolutionTier::FourK, BitratePreset::Low) => 15_000,
            (ResolutionTier::FourK, BitratePreset::Medium) => 30_000,
            (ResolutionTier::FourK, BitratePreset::High) => 50_000,
        }
    }
}

/// Resolution tiers for bitrate calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionTier {
    SD,
    HD,
    FullHD,
    FourK,
}

impl ResolutionTier {
    pub fn for_width(width: u32) -> Self {
        match width {
            w if w >= 3840 => ResolutionTier::FourK,
            w if w >= 1920 => ResolutionTier::FullHD,
            w if w >= 1280 => ResolutionTier::HD,
            _ => ResolutionTier::SD,
        }
    }
}

/// Naming and placement of saved media
pub mod media {
    /// Folder created under the user's Pictures and Videos directories
    pub const FOLDER: &str = "KameraKu";

    pub const PHOTO_PREFIX: &str = "IMG_";
    pub const PHOTO_EXTENSION: &str = "jpg";
    pub const VIDEO_PREFIX: &str = "VID_";
    pub const VIDEO_EXTENSION: &str = "mp4";

    /// Local-time stamp with millisecond precision, e.g. `2024-05-01-13-45-12-034`
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S-%3f";

    /// Longest edge of the decoded capture thumbnail
    pub const THUMBNAIL_SIZE: u32 = 256;

    /// Width assumed for bitrate selection before any frame has arrived
    pub const FALLBACK_RECORDING_WIDTH: u32 = 1280;
}

/// Timing constants
pub mod timing {
    use super::Duration;

    /// How long the last-photo thumbnail stays visible
    pub const THUMBNAIL_DISPLAY: Duration = Duration::from_secs(3);

    /// How long the flash stays lit before the frame is taken
    pub const PRE_FLASH: Duration = Duration::from_millis(800);

    /// Wait before rebinding after a failed session bind
    pub const BIND_RETRY: Duration = Duration::from_secs(5);

    /// Poll interval for frames and cancellation inside the binder
    pub const FRAME_POLL: Duration = Duration::from_millis(16);

    /// Poll interval for recorder stop requests and bus errors
    pub const RECORDER_POLL: Duration = Duration::from_millis(200);

    /// Upper bound on waiting for the muxer to finish after EOS
    pub const FINALIZE_TIMEOUT_SECS: u64 = 5;

    /// Pipeline state change timeout on stop
    pub const STOP_TIMEOUT_SECS: u64 = 2;

    /// Pipeline playing state timeout on start
    pub const START_TIMEOUT_SECS: u64 = 5;

    /// Frame counter modulo for periodic logging
    pub const FRAME_LOG_INTERVAL: u64 = 30;
}

/// GStreamer pipeline constants
pub mod pipeline {
    /// Maximum buffer queue size (keep small for low latency)
    pub const MAX_BUFFERS: u32 = 2;

    /// Bounded channel between the appsink callback and the UI
    pub const FRAME_CHANNEL_CAPACITY: usize = 4;
}

/// UI constants
pub mod ui {
    /// Capture button size (outer)
    pub const CAPTURE_BUTTON_OUTER: f32 = 64.0;

    /// Capture button size (inner)
    pub const CAPTURE_BUTTON_INNER: f32 = 52.0;

    /// Capture button corner radius (fully round at inner size)
    pub const CAPTURE_BUTTON_RADIUS: f32 = 26.0;

    /// Thumbnail card edge length
    pub const THUMBNAIL_CARD: f32 = 56.0;

    /// Overlay button/container background transparency (0.0 = transparent, 1.0 = opaque)
    pub const OVERLAY_BACKGROUND_ALPHA: f32 = 0.6;

    /// Corner radius of control cards
    pub const CARD_RADIUS: f32 = 12.0;

    /// Spacing between control cards
    pub const CARD_SPACING: u16 = 12;
}
