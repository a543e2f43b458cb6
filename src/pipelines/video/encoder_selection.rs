// SPDX-License-Identifier: GPL-3.0-only

//! Encoder selection for the recording pipeline
//!
//! Recordings are always H.264 in MP4. Hardware encoders are tried first,
//! software ones after. Audio prefers AAC, with Opus as the fallback that
//! mp4mux also accepts.

use crate::errors::RecordingError;
use gstreamer as gst;
use gstreamer::prelude::*;
use tracing::{debug, info, warn};

/// H.264 encoders in priority order: `(element, is_hardware)`
pub const VIDEO_ENCODERS: &[(&str, bool)] = &[
    ("vah264enc", true),
    ("vaapih264enc", true),
    ("nvh264enc", true),
    ("v4l2h264enc", true),
    ("x264enc", false),
    ("openh264enc", false),
];

/// Audio encoders in priority order
pub const AUDIO_ENCODERS: &[&str] = &["avenc_aac", "fdkaacenc", "faac", "voaacenc", "opusenc"];

/// Audio bitrate in bits per second
pub const AUDIO_BITRATE_BPS: i32 = 128_000;

/// Selected video encoding elements
pub struct SelectedVideoEncoder {
    pub encoder: gst::Element,
    pub parser: gst::Element,
    pub name: &'static str,
    pub is_hardware: bool,
}

/// Pick the first H.264 encoder that can be created
pub fn select_video_encoder(bitrate_kbps: u32) -> Result<SelectedVideoEncoder, RecordingError> {
    gst::init()?;

    for &(name, is_hardware) in VIDEO_ENCODERS {
        let Ok(encoder) = gst::ElementFactory::make(name).build() else {
            debug!(encoder = name, "Encoder not available");
            continue;
        };

        info!(encoder = name, hardware = is_hardware, bitrate_kbps, "Selected video encoder");
        configure_video_encoder(&encoder, name, bitrate_kbps);

        let parser = gst::ElementFactory::make("h264parse")
            .build()
            .map_err(|e| RecordingError::EncoderNotAvailable(format!("h264parse: {}", e)))?;

        return Ok(SelectedVideoEncoder {
            encoder,
            parser,
            name,
            is_hardware,
        });
    }

    Err(RecordingError::EncoderNotAvailable(
        "No H.264 encoder available. Install gstreamer1-plugins-ugly (x264enc) or gstreamer1-plugin-openh264".to_string(),
    ))
}

fn configure_video_encoder(encoder: &gst::Element, name: &str, bitrate_kbps: u32) {
    match name {
        "x264enc" => {
            encoder.set_property_from_str("speed-preset", "veryfast");
            encoder.set_property_from_str("tune", "zerolatency");
            encoder.set_property("bitrate", bitrate_kbps);
        }
        "vah264enc" | "vaapih264enc" => {
            encoder.set_property_from_str("rate-control", "cbr");
            encoder.set_property("bitrate", bitrate_kbps);
        }
        "nvh264enc" => {
            encoder.set_property("bitrate", bitrate_kbps);
            encoder.set_property_from_str("rc-mode", "vbr");
        }
        "openh264enc" => {
            encoder.set_property_from_str("rate-control", "bitrate");
            // bits per second
            encoder.set_property("bitrate", bitrate_kbps * 1000);
            encoder.set_property_from_str("usage-type", "camera");
        }
        _ => {
            debug!(encoder = name, "Using encoder defaults");
        }
    }
}

/// Pick an audio encoder for the MP4 container, if any is installed
pub fn select_audio_encoder() -> Option<gst::Element> {
    if gst::init().is_err() {
        return None;
    }

    for &name in AUDIO_ENCODERS {
        let Ok(encoder) = gst::ElementFactory::make(name).build() else {
            continue;
        };

        // All of them take bits per second, with differing integer types
        if encoder.has_property("bitrate") {
            encoder.set_property_from_str("bitrate", &AUDIO_BITRATE_BPS.to_string());
        }

        info!(encoder = name, "Selected audio encoder");
        return Some(encoder);
    }

    warn!("No audio encoder available, recording without audio");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hardware_encoders_come_first() {
        let first_software = VIDEO_ENCODERS
            .iter()
            .position(|(_, hw)| !hw)
            .expect("software fallback present");
        assert!(VIDEO_ENCODERS[..first_software].iter().all(|(_, hw)| *hw));
        assert!(VIDEO_ENCODERS[first_software..].iter().all(|(_, hw)| !hw));
    }

    #[test]
    fn aac_preferred_over_opus() {
        let opus = AUDIO_ENCODERS.iter().position(|e| *e == "opusenc");
        let aac = AUDIO_ENCODERS.iter().position(|e| *e == "avenc_aac");
        assert!(aac < opus);
    }
}
