// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::BitratePreset;
use crate::pipelines::photo::EncodingQuality;
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use cosmic::{Theme, theme};
use serde::{Deserialize, Serialize};

/// Application theme preference
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AppTheme {
    /// Follow the system setting
    #[default]
    System,
    Dark,
    Light,
}

impl AppTheme {
    /// Theme choices in settings order
    pub const ALL: [AppTheme; 3] = [AppTheme::System, AppTheme::Dark, AppTheme::Light];

    /// Get the COSMIC theme for this preference
    pub fn theme(&self) -> Theme {
        match self {
            Self::Dark => {
                let mut theme = theme::system_dark();
                theme.theme_type.prefer_dark(Some(true));
                theme
            }
            Self::Light => {
                let mut theme = theme::system_light();
                theme.theme_type.prefer_dark(Some(false));
                theme
            }
            Self::System => theme::system_preference(),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::System => 0,
            Self::Dark => 1,
            Self::Light => 2,
        }
    }

    /// Theme at `index` in [`AppTheme::ALL`], or `None` when out of range
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Persistent user preferences
///
/// Session state (camera selection, flash, torch) is deliberately absent:
/// every launch starts on the back camera with flash and torch off.
#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Application theme preference (System, Dark, Light)
    pub app_theme: AppTheme,
    /// Mirror the front camera preview horizontally (selfie mode)
    pub mirror_preview: bool,
    /// JPEG quality for saved photos
    pub jpeg_quality: EncodingQuality,
    /// Video encoder bitrate preset (Low, Medium, High)
    pub bitrate_preset: BitratePreset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_theme: AppTheme::default(),
            mirror_preview: true,
            jpeg_quality: EncodingQuality::default(),
            bitrate_preset: BitratePreset::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_index_round_trips() {
        for theme in AppTheme::ALL {
            assert_eq!(AppTheme::from_index(theme.index()), Some(theme));
        }
        assert_eq!(AppTheme::from_index(3), None);
    }
}
