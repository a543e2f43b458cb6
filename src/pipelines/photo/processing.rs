// SPDX-License-Identifier: GPL-3.0-only

//! Frame post-processing before encoding
//!
//! Preview frames are already upright. The only work left is dropping the
//! alpha channel and undoing the display mirror, so saved photos show the
//! scene as the camera saw it.

use crate::backends::camera::types::CameraFrame;
use crate::errors::PhotoError;
use image::{RgbImage, RgbaImage};
use tracing::debug;

/// Convert a preview frame into the RGB image that gets saved
pub fn frame_to_rgb(frame: &CameraFrame) -> Result<RgbImage, PhotoError> {
    let rgba = RgbaImage::from_raw(frame.width, frame.height, frame.data.to_vec())
        .ok_or(PhotoError::NoFrameAvailable)?;

    let rgba = if frame.mirrored {
        debug!("Undoing preview mirror");
        image::imageops::flip_horizontal(&rgba)
    } else {
        rgba
    };

    Ok(image::DynamicImage::ImageRgba8(rgba).to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    fn frame(mirrored: bool) -> CameraFrame {
        // 2x1: red then blue
        CameraFrame {
            width: 2,
            height: 1,
            data: Arc::from(vec![255, 0, 0, 255, 0, 0, 255, 255]),
            mirrored,
            captured_at: Instant::now(),
        }
    }

    #[test]
    fn drops_alpha() {
        let rgb = frame_to_rgb(&frame(false)).expect("convert");
        assert_eq!(rgb.as_raw(), &vec![255, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn mirrored_frames_are_flipped_back() {
        let rgb = frame_to_rgb(&frame(true)).expect("convert");
        assert_eq!(rgb.get_pixel(0, 0).0, [0, 0, 255]);
    }

    #[test]
    fn truncated_frames_are_rejected() {
        let mut bad = frame(false);
        bad.data = Arc::from(vec![0u8; 3]);
        assert!(frame_to_rgb(&bad).is_err());
    }
}
