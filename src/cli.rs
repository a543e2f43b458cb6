// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for camera operations
//!
//! This module provides command-line functionality for:
//! - Listing available cameras
//! - Taking photos
//! - Recording videos

use cosmic::iced::futures::StreamExt;
use cosmic::iced::futures::channel::mpsc;
use kameraku::Config;
use kameraku::backends::camera::types::{CameraDevice, CameraFrame, Facing, PreviewOptions};
use kameraku::backends::camera::{CameraBackendManager, camera_provider};
use kameraku::constants::{media, pipeline};
use kameraku::permissions::request_camera_access;
use kameraku::pipelines::photo::PhotoPipeline;
use kameraku::pipelines::video::VideoRecorder;
use kameraku::storage::{MediaKind, next_output_path};
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Time to let exposure settle before keeping a frame
const WARMUP: Duration = Duration::from_millis(500);

/// Give up when the camera delivers nothing for this long
const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// List all available cameras
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    let cameras = rt.block_on(async {
        let provider = open_provider().await?;
        Ok::<_, Box<dyn std::error::Error>>(provider.enumerate_cameras()?)
    })?;

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {}", index, camera.name);
        println!("      Location: {}", camera.location);
        println!("      Rotation: {}", camera.rotation);
        if let Some(node_id) = &camera.node_id {
            println!("      Node: {}", node_id);
        }
        println!();
    }

    Ok(())
}

/// Take a photo with the camera facing `facing`
pub fn take_photo(
    facing: Facing,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    gstreamer::init()?;

    let rt = tokio::runtime::Runtime::new()?;
    let saved = rt.block_on(async {
        let provider = open_provider().await?;
        let device = provider.camera_for(facing)?;
        println!("Using camera: {}", device.name);

        let frame = grab_frame(provider, &device).await?;
        println!("Captured: {}x{}", frame.width, frame.height);

        let path = match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                path
            }
            None => next_output_path(MediaKind::Photo)?,
        };

        let saved = PhotoPipeline::new(Config::default().jpeg_quality)
            .capture_and_save(frame, path)
            .await?;
        Ok::<_, Box<dyn std::error::Error>>(saved)
    })?;

    println!("Photo saved: {}", saved.display());
    Ok(())
}

/// Record a video of `duration` seconds with the camera facing `facing`
pub fn record_video(
    facing: Facing,
    duration: u64,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    gstreamer::init()?;

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(async {
        let provider = open_provider().await?;
        let device = provider.camera_for(facing)?;
        println!("Using camera: {}", device.name);

        let path = match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                path
            }
            None => next_output_path(MediaKind::Video)?,
        };
        println!("Output: {}", path.display());
        println!("Duration: {} seconds", duration);

        let bitrate_kbps = Config::default()
            .bitrate_preset
            .bitrate_kbps(media::FALLBACK_RECORDING_WIDTH);

        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel();
        let recording = tokio::spawn(VideoRecorder::record(
            device,
            provider.remote(),
            path,
            bitrate_kbps,
            stop_rx,
        ));

        println!();
        println!("Recording... (press Ctrl+C to stop early)");

        let start = Instant::now();
        let target = Duration::from_secs(duration);
        let mut ticker = tokio::time::interval(Duration::from_millis(100));
        while start.elapsed() < target && !recording.is_finished() {
            tokio::select! {
                _ = ticker.tick() => {
                    let elapsed = start.elapsed().as_secs();
                    print!("\rRecording: {:02}:{:02}", elapsed / 60, elapsed % 60);
                    std::io::stdout().flush()?;
                }
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    println!("Stopping early...");
                    break;
                }
            }
        }
        println!();

        // The recorder may have ended on its own after an error
        let _ = stop_tx.send(());
        let outcome = recording.await??;
        Ok::<_, Box<dyn std::error::Error>>(outcome)
    })?;

    if outcome.with_audio {
        println!("Video saved: {}", outcome.path.display());
    } else {
        println!("Video saved (no audio): {}", outcome.path.display());
    }
    Ok(())
}

/// Ask the portal for camera access and create the provider
async fn open_provider() -> Result<&'static CameraBackendManager, Box<dyn std::error::Error>> {
    let remote = request_camera_access().await?;
    Ok(camera_provider(remote).await?)
}

/// Bind a short-lived session and keep the first frame after warm-up
async fn grab_frame(
    provider: &CameraBackendManager,
    device: &CameraDevice,
) -> Result<CameraFrame, Box<dyn std::error::Error>> {
    let (sender, mut receiver) = mpsc::channel(pipeline::FRAME_CHANNEL_CAPACITY);
    let options = PreviewOptions {
        rotation: device.rotation,
        mirror: false,
    };
    let _session = provider.bind(device, options, sender)?;

    let start = Instant::now();
    let mut frame = None;
    loop {
        match tokio::time::timeout(FRAME_TIMEOUT, receiver.next()).await {
            Ok(Some(next)) => {
                frame = Some(next);
                if start.elapsed() > WARMUP {
                    break;
                }
            }
            Ok(None) | Err(_) => break,
        }
    }

    frame.ok_or_else(|| "Failed to capture frame from camera".into())
}
