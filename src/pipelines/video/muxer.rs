// SPDX-License-Identifier: GPL-3.0-only

//! MP4 muxing and file output

use crate::errors::RecordingError;
use gstreamer as gst;
use gstreamer::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Muxer and file sink for one recording
pub struct MuxerConfig {
    pub muxer: gst::Element,
    pub filesink: gst::Element,
}

/// Create `mp4mux` writing to `output_path`
pub fn create_muxer(output_path: &Path) -> Result<MuxerConfig, RecordingError> {
    info!(path = %output_path.display(), "Creating muxer");

    let muxer = gst::ElementFactory::make("mp4mux")
        .build()
        .map_err(|e| RecordingError::EncoderNotAvailable(format!("mp4mux: {}", e)))?;

    // Non-streamable output gets duration and index written for seeking
    if muxer.has_property("streamable") {
        muxer.set_property("streamable", false);
    }

    let location = output_path.to_str().ok_or_else(|| {
        RecordingError::StartFailed(format!("Non UTF-8 path: {}", output_path.display()))
    })?;
    let filesink = gst::ElementFactory::make("filesink")
        .property("location", location)
        .build()
        .map_err(|e| RecordingError::StartFailed(format!("Failed to create filesink: {}", e)))?;

    debug!("Muxer and filesink created");
    Ok(MuxerConfig { muxer, filesink })
}

/// Link an encoder (or parser) output to the muxer
pub fn link_to_muxer(
    upstream: &gst::Element,
    muxer: &gst::Element,
    stream: &str,
) -> Result<(), RecordingError> {
    upstream.link(muxer).map_err(|_| {
        RecordingError::StartFailed(format!("Failed to link {} stream to muxer", stream))
    })?;
    debug!(stream, "Linked to muxer");
    Ok(())
}

/// Link muxer to filesink
pub fn link_muxer_to_sink(config: &MuxerConfig) -> Result<(), RecordingError> {
    config
        .muxer
        .link(&config.filesink)
        .map_err(|_| RecordingError::StartFailed("Failed to link muxer to filesink".to_string()))
}
