// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use kameraku::Config;
use kameraku::config::AppTheme;
use kameraku::constants::BitratePreset;
use kameraku::pipelines::photo::EncodingQuality;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert!(
        config.mirror_preview,
        "Mirror preview should be enabled by default"
    );
    assert_eq!(config.app_theme, AppTheme::System);
    assert_eq!(config.jpeg_quality, EncodingQuality::High);
    assert_eq!(config.bitrate_preset, BitratePreset::Medium);
}

#[test]
fn test_theme_index_round_trip() {
    for theme in AppTheme::ALL {
        assert_eq!(AppTheme::from_index(theme.index()), Some(theme));
    }
    assert_eq!(AppTheme::from_index(AppTheme::ALL.len()), None);
}

#[test]
fn test_quality_index_falls_back_to_default() {
    assert_eq!(EncodingQuality::from_index(99), EncodingQuality::default());
    assert_eq!(BitratePreset::from_index(99), BitratePreset::default());
}
