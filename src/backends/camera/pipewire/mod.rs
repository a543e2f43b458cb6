// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire camera backend
//!
//! This backend uses PipeWire for camera enumeration and preview capture.
//! When the camera portal handed out a remote, every pipeline connects
//! through it instead of the session's default PipeWire daemon.

mod enumeration;
mod pipeline;

pub use enumeration::{enumerate_pipewire_cameras, parse_video_sources};
pub use pipeline::{PipeWirePipeline, preview_description, source_properties};

use super::CameraBackend;
use super::types::*;
use crate::permissions::PipeWireRemote;
use tracing::info;

/// PipeWire backend implementation
pub struct PipeWireBackend {
    remote: Option<PipeWireRemote>,
    /// Active GStreamer pipeline for preview
    pipeline: Option<PipeWirePipeline>,
}

impl PipeWireBackend {
    pub fn new(remote: Option<PipeWireRemote>) -> Self {
        Self {
            remote,
            pipeline: None,
        }
    }
}

impl CameraBackend for PipeWireBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        enumerate_pipewire_cameras()
    }

    fn bind(
        &mut self,
        device: &CameraDevice,
        options: PreviewOptions,
        sender: FrameSender,
    ) -> BackendResult<()> {
        info!(device = %device.name, "Binding PipeWire preview");

        // One session at a time
        self.unbind()?;

        let pipeline = PipeWirePipeline::new(device, self.remote.as_ref(), options, sender)?;
        self.pipeline = Some(pipeline);
        Ok(())
    }

    fn unbind(&mut self) -> BackendResult<()> {
        if let Some(pipeline) = self.pipeline.take() {
            info!("Unbinding PipeWire preview");
            pipeline.stop()?;
        }
        Ok(())
    }

    fn is_bound(&self) -> bool {
        self.pipeline.is_some()
    }

    fn remote(&self) -> Option<&PipeWireRemote> {
        self.remote.as_ref()
    }
}
