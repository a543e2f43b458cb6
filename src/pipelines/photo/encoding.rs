// SPDX-License-Identifier: GPL-3.0-only

//! JPEG encoding and saving
//!
//! Encoding runs on the blocking pool to keep the UI responsive.

use crate::errors::PhotoError;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Encoding quality settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EncodingQuality {
    /// Low quality (high compression)
    Low,
    /// Medium quality (balanced)
    Medium,
    /// High quality (low compression)
    #[default]
    High,
    /// Maximum quality (minimal compression)
    Maximum,
}

impl EncodingQuality {
    pub const ALL: [EncodingQuality; 4] = [
        EncodingQuality::Low,
        EncodingQuality::Medium,
        EncodingQuality::High,
        EncodingQuality::Maximum,
    ];

    /// Get JPEG quality value (0-100)
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            EncodingQuality::Low => 60,
            EncodingQuality::Medium => 80,
            EncodingQuality::High => 92,
            EncodingQuality::Maximum => 98,
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|q| q == self).unwrap_or(2)
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }
}

/// Photo encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct PhotoEncoder {
    quality: EncodingQuality,
}

impl PhotoEncoder {
    pub fn new(quality: EncodingQuality) -> Self {
        Self { quality }
    }

    pub fn quality(&self) -> EncodingQuality {
        self.quality
    }

    /// Encode to JPEG bytes
    pub fn encode_jpeg(&self, image: &RgbImage) -> Result<Vec<u8>, PhotoError> {
        let mut buffer = Vec::new();
        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
            &mut buffer,
            self.quality.jpeg_quality(),
        );
        encoder.encode(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )?;

        debug!(size = buffer.len(), quality = ?self.quality, "Encoding complete");
        Ok(buffer)
    }

    /// Write encoded bytes to `path`
    pub async fn save(&self, data: Vec<u8>, path: PathBuf) -> Result<PathBuf, PhotoError> {
        info!(path = %path.display(), "Saving photo");

        let target = path.clone();
        tokio::task::spawn_blocking(move || std::fs::write(&target, &data))
            .await
            .map_err(|e| PhotoError::SaveFailed(format!("Save task error: {}", e)))??;

        info!(path = %path.display(), "Photo saved successfully");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_values_increase() {
        let values: Vec<u8> = EncodingQuality::ALL
            .iter()
            .map(EncodingQuality::jpeg_quality)
            .collect();
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn index_lookup_is_consistent() {
        for quality in EncodingQuality::ALL {
            assert_eq!(EncodingQuality::from_index(quality.index()), quality);
        }
        assert_eq!(EncodingQuality::from_index(99), EncodingQuality::High);
    }

    #[test]
    fn encodes_a_valid_jpeg() {
        let image = RgbImage::from_pixel(8, 8, image::Rgb([200, 40, 10]));
        let data = PhotoEncoder::new(EncodingQuality::Medium)
            .encode_jpeg(&image)
            .expect("encode");
        // SOI marker
        assert_eq!(&data[..2], &[0xFF, 0xD8]);
    }
}
