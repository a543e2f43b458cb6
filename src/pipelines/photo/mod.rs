// SPDX-License-Identifier: GPL-3.0-only

//! Async photo capture pipeline
//!
//! ```text
//! Latest preview frame → RGB (unmirrored) → JPEG → IMG_<timestamp>.jpg
//!       ↓
//! Preview continues uninterrupted
//! ```

pub mod encoding;
pub mod processing;

pub use encoding::{EncodingQuality, PhotoEncoder};

use crate::backends::camera::types::CameraFrame;
use crate::errors::PhotoError;
use std::path::PathBuf;
use tracing::info;

/// Complete photo capture pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct PhotoPipeline {
    encoder: PhotoEncoder,
}

impl PhotoPipeline {
    pub fn new(quality: EncodingQuality) -> Self {
        Self {
            encoder: PhotoEncoder::new(quality),
        }
    }

    /// Process, encode and save `frame` at `path`
    pub async fn capture_and_save(
        &self,
        frame: CameraFrame,
        path: PathBuf,
    ) -> Result<PathBuf, PhotoError> {
        info!(
            width = frame.width,
            height = frame.height,
            quality = ?self.encoder.quality(),
            "Starting photo pipeline"
        );

        let encoder = self.encoder;
        let data = tokio::task::spawn_blocking(move || {
            let image = processing::frame_to_rgb(&frame)?;
            encoder.encode_jpeg(&image)
        })
        .await
        .map_err(|e| PhotoError::EncodingFailed(format!("Encoding task error: {}", e)))??;

        self.encoder.save(data, path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    #[tokio::test]
    async fn saves_a_decodable_photo() {
        let dir = std::env::temp_dir().join(format!("kameraku-photo-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("IMG_test.jpg");

        let frame = CameraFrame {
            width: 4,
            height: 2,
            data: Arc::from(vec![128u8; 4 * 2 * 4]),
            mirrored: false,
            captured_at: Instant::now(),
        };

        let saved = PhotoPipeline::new(EncodingQuality::High)
            .capture_and_save(frame, path.clone())
            .await
            .expect("save photo");
        assert_eq!(saved, path);

        let decoded = image::open(&saved).expect("decode saved photo");
        assert_eq!((decoded.width(), decoded.height()), (4, 2));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn missing_directory_is_a_save_error() {
        let frame = CameraFrame {
            width: 1,
            height: 1,
            data: Arc::from(vec![0u8; 4]),
            mirrored: false,
            captured_at: Instant::now(),
        };
        let result = PhotoPipeline::default()
            .capture_and_save(frame, PathBuf::from("/nonexistent/kameraku/IMG.jpg"))
            .await;
        assert!(matches!(result, Err(PhotoError::SaveFailed(_))));
    }
}
