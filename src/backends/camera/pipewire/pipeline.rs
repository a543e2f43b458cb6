// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire GStreamer pipeline for the camera preview
//!
//! The pipeline delivers upright RGBA frames: rotation and the optional
//! mirror flip are applied by `videoflip` before the appsink, so the UI and
//! the photo encoder never deal with sensor orientation.

use super::super::types::*;
use crate::constants::{pipeline, timing};
use crate::permissions::PipeWireRemote;
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

static FRAME_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Maximum retries for pipeline creation (handles PipeWire race conditions)
const PIPELINE_CREATE_RETRIES: u32 = 3;
/// Delay between retries (long enough for a released camera to settle)
const PIPELINE_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Source element properties selecting the camera node
pub fn source_properties(device: &CameraDevice) -> String {
    match device.target_object() {
        Some(target) => format!("target-object={} ", target),
        None => String::new(),
    }
}

/// `gst-launch` description of the preview pipeline
pub fn preview_description(device: &CameraDevice, options: PreviewOptions) -> String {
    let mut chain = format!(
        "pipewiresrc name=src {}do-timestamp=true ! \
         queue max-size-buffers={} leaky=downstream ! \
         videoconvert ! ",
        source_properties(device),
        pipeline::MAX_BUFFERS
    );

    if let Some(method) = options.rotation.videoflip_method() {
        chain.push_str(&format!("videoflip method={} ! ", method));
    }
    if options.mirror {
        chain.push_str("videoflip method=horizontal-flip ! ");
    }

    chain.push_str("video/x-raw,format=RGBA ! appsink name=sink");
    chain
}

/// PipeWire camera pipeline
pub struct PipeWirePipeline {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
}

impl PipeWirePipeline {
    /// Build and start a preview pipeline that pushes frames into `frame_sender`
    pub fn new(
        device: &CameraDevice,
        remote: Option<&PipeWireRemote>,
        options: PreviewOptions,
        frame_sender: FrameSender,
    ) -> BackendResult<Self> {
        info!(
            device = %device.name,
            rotation = %options.rotation,
            mirror = options.mirror,
            "Creating PipeWire pipeline"
        );

        gstreamer::init().map_err(|e| BackendError::InitializationFailed(e.to_string()))?;
        gstreamer::ElementFactory::find("pipewiresrc").ok_or_else(|| {
            BackendError::NotAvailable("pipewiresrc factory not found".to_string())
        })?;

        let description = preview_description(device, options);
        let mut last_error = None;

        for attempt in 1..=PIPELINE_CREATE_RETRIES {
            info!(pipeline = %description, attempt, "Attempting to launch pipeline");
            match Self::launch(&description, remote, options.mirror, frame_sender.clone()) {
                Ok(pipeline) => return Ok(pipeline),
                Err(e) => {
                    if attempt < PIPELINE_CREATE_RETRIES {
                        warn!(
                            attempt,
                            max_attempts = PIPELINE_CREATE_RETRIES,
                            error = %e,
                            "Pipeline launch failed, retrying"
                        );
                        std::thread::sleep(PIPELINE_RETRY_DELAY);
                    }
                    last_error = Some(e);
                }
            }
        }

        error!("All pipeline launch attempts failed");
        Err(last_error.unwrap_or_else(|| {
            BackendError::InitializationFailed("Pipeline creation failed".to_string())
        }))
    }

    fn launch(
        description: &str,
        remote: Option<&PipeWireRemote>,
        mirrored: bool,
        frame_sender: FrameSender,
    ) -> BackendResult<Self> {
        let pipeline = gstreamer::parse::launch(description)
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))?
            .dynamic_cast::<gstreamer::Pipeline>()
            .map_err(|_| BackendError::InitializationFailed("Not a pipeline".to_string()))?;

        if let Some(remote) = remote {
            let src = pipeline.by_name("src").ok_or_else(|| {
                BackendError::InitializationFailed("Failed to get pipewiresrc".to_string())
            })?;
            // pipewiresrc duplicates the descriptor, the portal remote stays ours
            src.set_property("fd", remote.raw_fd());
            debug!(fd = remote.raw_fd(), "Using portal PipeWire remote");
        }

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| BackendError::InitializationFailed("Failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| {
                BackendError::InitializationFailed("Failed to cast appsink".to_string())
            })?;

        appsink.set_property("emit-signals", true);
        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", pipeline::MAX_BUFFERS);
        appsink.set_property("drop", true);
        appsink.set_property("enable-last-sample", false);

        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_num = FRAME_COUNTER.fetch_add(1, Ordering::Relaxed);
                    let periodic = frame_num % timing::FRAME_LOG_INTERVAL == 0;

                    let sample = appsink.pull_sample().map_err(|e| {
                        if periodic {
                            error!(frame = frame_num, error = ?e, "Failed to pull sample");
                        }
                        gstreamer::FlowError::Eos
                    })?;
                    let buffer = sample.buffer().ok_or(gstreamer::FlowError::Error)?;
                    if buffer.flags().contains(gstreamer::BufferFlags::CORRUPTED) {
                        if periodic {
                            warn!(frame = frame_num, "Buffer marked as corrupted, skipping frame");
                        }
                        return Ok(gstreamer::FlowSuccess::Ok);
                    }

                    let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;
                    let info = VideoInfo::from_caps(caps).map_err(|e| {
                        if periodic {
                            error!(frame = frame_num, error = ?e, "Failed to get video info");
                        }
                        gstreamer::FlowError::Error
                    })?;
                    let map = buffer
                        .map_readable()
                        .map_err(|_| gstreamer::FlowError::Error)?;

                    let Some(frame) = CameraFrame::from_strided(
                        info.width(),
                        info.height(),
                        info.stride()[0] as usize,
                        map.as_slice(),
                        mirrored,
                    ) else {
                        warn!(frame = frame_num, "Short RGBA buffer, skipping frame");
                        return Ok(gstreamer::FlowSuccess::Ok);
                    };

                    let send_start = Instant::now();
                    let mut sender = frame_sender.clone();
                    match sender.try_send(frame) {
                        Ok(_) => {
                            if periodic {
                                debug!(
                                    frame = frame_num,
                                    send_us = send_start.elapsed().as_micros(),
                                    width = info.width(),
                                    height = info.height(),
                                    "Frame performance"
                                );
                            }
                        }
                        Err(e) if e.is_disconnected() => {
                            debug!("Preview receiver gone, ending stream");
                            return Err(gstreamer::FlowError::Eos);
                        }
                        Err(_) => {
                            if periodic {
                                debug!(frame = frame_num, "Frame dropped (channel full)");
                            }
                        }
                    }

                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        pipeline.set_state(gstreamer::State::Playing).map_err(|e| {
            BackendError::InitializationFailed(format!("Failed to start pipeline: {}", e))
        })?;

        let (result, state, pending) = pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::START_TIMEOUT_SECS,
        ));
        debug!(result = ?result, state = ?state, pending = ?pending, "Pipeline state");

        if let Some(bus) = pipeline.bus()
            && let Some(msg) = bus.pop_filtered(&[gstreamer::MessageType::Error])
            && let gstreamer::MessageView::Error(err) = msg.view()
        {
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(BackendError::InitializationFailed(err.error().to_string()));
        }

        if state != gstreamer::State::Playing {
            warn!("Pipeline is not in PLAYING state");
        }

        info!("PipeWire camera initialization complete");
        Ok(Self { pipeline, appsink })
    }

    /// Stop the pipeline and release the camera
    pub fn stop(self) -> BackendResult<()> {
        info!("Stopping PipeWire pipeline");

        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());

        self.pipeline
            .set_state(gstreamer::State::Null)
            .map_err(|e| BackendError::Other(format!("Failed to stop pipeline: {}", e)))?;

        let (result, state, _) = self.pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::STOP_TIMEOUT_SECS,
        ));
        match result {
            Ok(_) => info!(state = ?state, "PipeWire pipeline stopped successfully"),
            Err(e) => debug!(error = ?e, state = ?state, "Pipeline state change had issues"),
        }
        Ok(())
    }
}

impl Drop for PipeWirePipeline {
    fn drop(&mut self) {
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());
        let _ = self.pipeline.set_state(gstreamer::State::Null);
        debug!("PipeWire pipeline dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn back_camera() -> CameraDevice {
        CameraDevice {
            name: "Back Camera".into(),
            path: "pipewire-serial-61".into(),
            node_id: None,
            location: CameraLocation::Back,
            rotation: SensorRotation::Rotate90,
        }
    }

    #[test]
    fn description_targets_the_selected_node() {
        let desc = preview_description(&back_camera(), PreviewOptions::default());
        assert!(desc.starts_with("pipewiresrc name=src target-object=61 "));
        assert!(desc.ends_with("video/x-raw,format=RGBA ! appsink name=sink"));
        assert!(!desc.contains("videoflip"));
    }

    #[test]
    fn rotation_and_mirror_add_flips() {
        let options = PreviewOptions {
            rotation: SensorRotation::Rotate90,
            mirror: true,
        };
        let desc = preview_description(&back_camera(), options);
        let rotate = desc.find("videoflip method=clockwise").expect("rotation flip");
        let mirror = desc
            .find("videoflip method=horizontal-flip")
            .expect("mirror flip");
        assert!(rotate < mirror, "mirror applies to the upright image");
    }

    #[test]
    fn default_camera_has_no_target() {
        let desc = preview_description(&CameraDevice::default_camera(), PreviewOptions::default());
        assert!(!desc.contains("target-object"));
    }
}
