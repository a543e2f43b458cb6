// SPDX-License-Identifier: GPL-3.0-only

//! Video recording pipeline
//!
//! The recorder opens its own PipeWire stream next to the preview, so the
//! preview keeps running while recording:
//!
//! ```text
//! pipewiresrc → videoconvert → [videoflip] → queue → H.264 → h264parse ─┐
//!                                                                       ├→ mp4mux → filesink
//! pipewiresrc (mic) → queue → volume → rglimiter → convert → AAC ───────┘
//! ```

use super::encoder_selection::{select_audio_encoder, select_video_encoder};
use super::muxer::{create_muxer, link_muxer_to_sink, link_to_muxer};
use crate::backends::audio::{AudioDevice, available_microphone};
use crate::backends::camera::types::CameraDevice;
use crate::constants::timing;
use crate::errors::RecordingError;
use crate::permissions::PipeWireRemote;
use gstreamer as gst;
use gstreamer::prelude::*;
use std::path::PathBuf;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

/// A finalized recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingOutcome {
    pub path: PathBuf,
    pub with_audio: bool,
}

#[derive(Debug)]
pub struct VideoRecorder {
    pipeline: gst::Pipeline,
    output_path: PathBuf,
    with_audio: bool,
}

struct AudioBranch {
    source: gst::Element,
    queue: gst::Element,
    volume: gst::Element,
    limiter: gst::Element,
    convert: gst::Element,
    resample: gst::Element,
    encoder: gst::Element,
}

impl AudioBranch {
    fn elements(&self) -> [&gst::Element; 7] {
        [
            &self.source,
            &self.queue,
            &self.volume,
            &self.limiter,
            &self.convert,
            &self.resample,
            &self.encoder,
        ]
    }
}

fn make(factory: &str) -> Result<gst::Element, RecordingError> {
    gst::ElementFactory::make(factory)
        .build()
        .map_err(|e| RecordingError::StartFailed(format!("Failed to create {}: {}", factory, e)))
}

impl VideoRecorder {
    /// Build a recording pipeline for `device`
    ///
    /// Audio is recorded only when `microphone` is given and an audio
    /// encoder is installed; otherwise the recording is silent.
    pub fn new(
        device: &CameraDevice,
        remote: Option<&PipeWireRemote>,
        output_path: PathBuf,
        bitrate_kbps: u32,
        microphone: Option<&AudioDevice>,
    ) -> Result<Self, RecordingError> {
        info!(
            device = %device.name,
            output = %output_path.display(),
            bitrate_kbps,
            microphone = ?microphone.map(|m| m.name.as_str()),
            "Creating video recorder"
        );

        gst::init()?;

        let video = select_video_encoder(bitrate_kbps)?;
        let pipeline = gst::Pipeline::new();

        let source = Self::create_video_source(device, remote)?;
        let convert = make("videoconvert")?;
        let flip = match device.rotation.videoflip_method() {
            Some(method) => {
                let flip = make("videoflip")?;
                flip.set_property_from_str("method", method);
                Some(flip)
            }
            None => None,
        };
        let queue = make("queue")?;

        let muxer = create_muxer(&output_path)?;

        let audio = match microphone {
            Some(mic) => match Self::create_audio_branch(mic) {
                Ok(branch) => Some(branch),
                Err(e) => {
                    warn!(error = %e, "Audio branch unavailable, recording without audio");
                    None
                }
            },
            None => None,
        };

        let mut video_chain: Vec<&gst::Element> = vec![&source, &convert];
        if let Some(ref flip) = flip {
            video_chain.push(flip);
        }
        video_chain.extend_from_slice(&[&queue, &video.encoder, &video.parser]);

        pipeline.add_many(&video_chain)?;
        pipeline.add_many([&muxer.muxer, &muxer.filesink])?;
        gst::Element::link_many(&video_chain)?;
        link_to_muxer(&video.parser, &muxer.muxer, "video")?;
        link_muxer_to_sink(&muxer)?;

        if let Some(ref branch) = audio {
            pipeline.add_many(branch.elements())?;
            gst::Element::link_many(branch.elements())?;
            link_to_muxer(&branch.encoder, &muxer.muxer, "audio")?;
        }

        debug!(encoder = video.name, hardware = video.is_hardware, "Recording pipeline built");

        Ok(Self {
            pipeline,
            output_path,
            with_audio: audio.is_some(),
        })
    }

    fn create_video_source(
        device: &CameraDevice,
        remote: Option<&PipeWireRemote>,
    ) -> Result<gst::Element, RecordingError> {
        let mut builder = gst::ElementFactory::make("pipewiresrc").property("do-timestamp", true);

        if let Some(target) = device.target_object() {
            info!(target, "Using PipeWire target-object");
            builder = builder.property("target-object", target);
        }
        if let Some(remote) = remote {
            builder = builder.property("fd", remote.raw_fd());
        }

        builder
            .build()
            .map_err(|e| RecordingError::StartFailed(format!("Failed to create pipewiresrc: {}", e)))
    }

    fn create_audio_branch(mic: &AudioDevice) -> Result<AudioBranch, RecordingError> {
        let encoder = select_audio_encoder()
            .ok_or_else(|| RecordingError::EncoderNotAvailable("audio".to_string()))?;

        // Microphones come from the session's PipeWire, never the camera portal
        let mut source_builder = gst::ElementFactory::make("pipewiresrc")
            .property("do-timestamp", true)
            .property("keepalive-time", 1000)
            .property("resend-last", false);
        if !mic.serial.is_empty() {
            source_builder = source_builder.property("target-object", mic.serial.as_str());
        }
        let source = source_builder.build().map_err(|e| {
            RecordingError::StartFailed(format!("Failed to create audio source: {}", e))
        })?;

        let queue = gst::ElementFactory::make("queue")
            .property("max-size-buffers", 200u32)
            .property("max-size-time", 2_000_000_000u64)
            .build()
            .map_err(|e| RecordingError::StartFailed(format!("Failed to create audio queue: {}", e)))?;

        // Unity gain; input level belongs to the sound settings
        let volume = make("volume")?;
        volume.set_property("volume", 1.0f64);

        Ok(AudioBranch {
            source,
            queue,
            volume,
            limiter: make("rglimiter")?,
            convert: make("audioconvert")?,
            resample: make("audioresample")?,
            encoder,
        })
    }

    /// Start recording, failing if the pipeline errors right away
    pub fn start(&self) -> Result<(), RecordingError> {
        info!("Starting video recording");
        self.pipeline
            .set_state(gst::State::Playing)
            .map_err(|e| RecordingError::StartFailed(e.to_string()))?;

        let bus = self
            .pipeline
            .bus()
            .ok_or_else(|| RecordingError::StartFailed("No bus available".to_string()))?;
        if let Some(msg) = bus.timed_pop_filtered(
            gst::ClockTime::from_mseconds(500),
            &[gst::MessageType::Error, gst::MessageType::Warning],
        ) {
            match msg.view() {
                gst::MessageView::Error(err) => {
                    error!(
                        error = %err.error(),
                        debug = ?err.debug(),
                        source = ?err.src().map(|s| s.name()),
                        "GStreamer error during start"
                    );
                    let _ = self.pipeline.set_state(gst::State::Null);
                    return Err(RecordingError::StartFailed(err.error().to_string()));
                }
                gst::MessageView::Warning(w) => {
                    warn!(warning = %w.error(), debug = ?w.debug(), "GStreamer warning during start");
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// An error the pipeline reported since the last poll, if any
    pub fn poll_error(&self) -> Option<RecordingError> {
        let msg = self.pipeline.bus()?.pop_filtered(&[gst::MessageType::Error])?;
        match msg.view() {
            gst::MessageView::Error(err) => {
                error!(error = %err.error(), debug = ?err.debug(), "Recording pipeline error");
                Some(RecordingError::PipelineError(err.error().to_string()))
            }
            _ => None,
        }
    }

    /// Send EOS and wait for the muxer to finish the file
    pub fn stop(self) -> Result<RecordingOutcome, RecordingError> {
        info!("Stopping video recording");

        if !self.pipeline.send_event(gst::event::Eos::new()) {
            warn!("Failed to send EOS event to pipeline");
        }

        let finalized = match self.pipeline.bus() {
            Some(bus) => match bus.timed_pop_filtered(
                gst::ClockTime::from_seconds(timing::FINALIZE_TIMEOUT_SECS),
                &[gst::MessageType::Eos, gst::MessageType::Error],
            ) {
                Some(msg) => match msg.view() {
                    gst::MessageView::Eos(_) => Ok(()),
                    gst::MessageView::Error(err) => {
                        Err(RecordingError::StopFailed(err.error().to_string()))
                    }
                    _ => Ok(()),
                },
                None => Err(RecordingError::StopFailed(
                    "Timed out waiting for the file to be finalized".to_string(),
                )),
            },
            None => Err(RecordingError::StopFailed("No bus available".to_string())),
        };

        self.pipeline
            .set_state(gst::State::Null)
            .map_err(|e| RecordingError::StopFailed(e.to_string()))?;
        finalized?;

        info!(path = %self.output_path.display(), audio = self.with_audio, "Recording saved");
        Ok(RecordingOutcome {
            path: self.output_path.clone(),
            with_audio: self.with_audio,
        })
    }

    /// Record until `stop` fires (or its sender is dropped), then finalize
    ///
    /// A pipeline error ends the recording early with that error.
    pub async fn record_until(
        self,
        mut stop: oneshot::Receiver<()>,
    ) -> Result<RecordingOutcome, RecordingError> {
        let mut ticker = tokio::time::interval(timing::RECORDER_POLL);

        loop {
            tokio::select! {
                _ = &mut stop => break,
                _ = ticker.tick() => {
                    if let Some(err) = self.poll_error() {
                        return Err(err);
                    }
                }
            }
        }

        tokio::task::spawn_blocking(move || self.stop())
            .await
            .map_err(|_| RecordingError::Aborted)?
    }

    /// Record `device` into `output_path` until `stop` fires
    ///
    /// The microphone is checked (never requested) when the recording starts;
    /// without one the clip is silent.
    pub async fn record(
        device: CameraDevice,
        remote: Option<PipeWireRemote>,
        output_path: PathBuf,
        bitrate_kbps: u32,
        stop: oneshot::Receiver<()>,
    ) -> Result<RecordingOutcome, RecordingError> {
        let recorder = tokio::task::spawn_blocking(move || {
            let microphone = available_microphone();
            if microphone.is_none() {
                info!("No microphone available, recording without audio");
            }
            let recorder = VideoRecorder::new(
                &device,
                remote.as_ref(),
                output_path,
                bitrate_kbps,
                microphone.as_ref(),
            )?;
            recorder.start()?;
            Ok::<_, RecordingError>(recorder)
        })
        .await
        .map_err(|_| RecordingError::Aborted)??;

        recorder.record_until(stop).await
    }
}

impl Drop for VideoRecorder {
    fn drop(&mut self) {
        let _ = self.pipeline.set_state(gst::State::Null);
    }
}
