// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use kameraku::constants::{BitratePreset, ResolutionTier, media, timing};
use std::time::Duration;

#[test]
fn test_bitrate_preset_values() {
    // Low, Medium, High
    assert_eq!(BitratePreset::ALL.len(), 3);
}

#[test]
fn test_bitrate_preset_ordering() {
    // Presets are ordered from lowest to highest quality
    let mut prev_bitrate = 0u32;
    for preset in BitratePreset::ALL {
        let bitrate = preset.bitrate_kbps(1920);
        assert!(
            bitrate > prev_bitrate,
            "Presets should be ordered from lowest to highest"
        );
        prev_bitrate = bitrate;
    }
}

#[test]
fn test_bitrate_scales_with_resolution() {
    let sd = BitratePreset::Medium.bitrate_kbps(640);
    let hd = BitratePreset::Medium.bitrate_kbps(1280);
    let full_hd = BitratePreset::Medium.bitrate_kbps(1920);
    let four_k = BitratePreset::Medium.bitrate_kbps(3840);

    assert!(sd < hd && hd < full_hd && full_hd < four_k);
}

#[test]
fn test_resolution_tier_thresholds() {
    assert_eq!(ResolutionTier::for_width(1279), ResolutionTier::SD);
    assert_eq!(ResolutionTier::for_width(1280), ResolutionTier::HD);
    assert_eq!(ResolutionTier::for_width(1920), ResolutionTier::FullHD);
    assert_eq!(ResolutionTier::for_width(4096), ResolutionTier::FourK);
}

#[test]
fn test_thumbnail_window() {
    assert_eq!(timing::THUMBNAIL_DISPLAY, Duration::from_secs(3));
}

#[test]
fn test_media_names() {
    assert_eq!(media::PHOTO_EXTENSION, "jpg");
    assert_eq!(media::VIDEO_EXTENSION, "mp4");
    assert_ne!(media::PHOTO_PREFIX, media::VIDEO_PREFIX);
}
