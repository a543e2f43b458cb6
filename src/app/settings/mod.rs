// SPDX-License-Identifier: GPL-3.0-only

//! Settings UI module
//!
//! This module handles the settings drawer:
//! - Localized dropdown labels
//! - Main settings view

pub mod view;

use crate::config::AppTheme;
use crate::constants::BitratePreset;
use crate::fl;
use crate::pipelines::photo::EncodingQuality;

/// Dropdown labels, built once so the drawer can borrow them
#[derive(Debug, Clone)]
pub struct SettingsOptions {
    pub themes: Vec<String>,
    pub jpeg_qualities: Vec<String>,
    pub bitrate_presets: Vec<String>,
}

impl SettingsOptions {
    pub fn new() -> Self {
        Self {
            themes: AppTheme::ALL.iter().map(|t| theme_label(*t)).collect(),
            jpeg_qualities: EncodingQuality::ALL
                .iter()
                .map(|q| quality_label(*q))
                .collect(),
            bitrate_presets: BitratePreset::ALL
                .iter()
                .map(|p| bitrate_label(*p))
                .collect(),
        }
    }
}

impl Default for SettingsOptions {
    fn default() -> Self {
        Self::new()
    }
}

fn theme_label(theme: AppTheme) -> String {
    match theme {
        AppTheme::System => fl!("theme-system"),
        AppTheme::Dark => fl!("theme-dark"),
        AppTheme::Light => fl!("theme-light"),
    }
}

fn quality_label(quality: EncodingQuality) -> String {
    let name = match quality {
        EncodingQuality::Low => fl!("quality-low"),
        EncodingQuality::Medium => fl!("quality-medium"),
        EncodingQuality::High => fl!("quality-high"),
        EncodingQuality::Maximum => fl!("quality-maximum"),
    };
    format!("{} ({})", name, quality.jpeg_quality())
}

fn bitrate_label(preset: BitratePreset) -> String {
    match preset {
        BitratePreset::Low => fl!("quality-low"),
        BitratePreset::Medium => fl!("quality-medium"),
        BitratePreset::High => fl!("quality-high"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_match_variant_order() {
        let options = SettingsOptions::new();
        assert_eq!(options.themes.len(), AppTheme::ALL.len());
        assert_eq!(options.jpeg_qualities.len(), EncodingQuality::ALL.len());
        assert_eq!(options.bitrate_presets.len(), BitratePreset::ALL.len());
        assert!(options.jpeg_qualities[3].contains("98"));
    }
}
