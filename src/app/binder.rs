// SPDX-License-Identifier: GPL-3.0-only

//! Camera session binder
//!
//! The preview session lives inside a subscription keyed by the binding
//! inputs. When the camera selection, flash mode or mirror setting changes
//! the key changes, the old stream is dropped (its [`SessionGuard`] unbinds
//! the camera) and a new session is bound. Without permission, or before the
//! provider is ready, no subscription exists at all.
//!
//! [`SessionGuard`]: crate::backends::camera::SessionGuard

use crate::app::session::BindingRequest;
use crate::app::state::{AppModel, Message};
use crate::backends::camera::types::{Facing, PreviewOptions};
use crate::backends::camera::{SessionGuard, existing_provider};
use crate::constants::{pipeline, timing};
use crate::errors::CameraError;
use cosmic::iced::Subscription;
use cosmic::iced::futures::channel::mpsc;
use cosmic::iced::futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{error, info, warn};

impl AppModel {
    /// Subscription that keeps a camera session bound while it is wanted
    pub(crate) fn session_subscription(&self) -> Subscription<Message> {
        let Some(request) = self.session.binding() else {
            return Subscription::none();
        };
        let mirror = self.config.mirror_preview && request.facing == Facing::Front;

        Subscription::run_with_id(
            ("camera-session", request, mirror),
            cosmic::iced::stream::channel(100, move |output| async move {
                run_session(request, mirror, output).await;
            }),
        )
    }
}

enum SessionEnd {
    /// The UI dropped the subscription
    Cancelled,
    /// The pipeline stopped delivering frames
    StreamEnded,
}

async fn run_session(request: BindingRequest, mirror: bool, mut output: mpsc::Sender<Message>) {
    info!(facing = %request.facing, flash = ?request.flash, mirror, "Camera session binder started");

    let Some(provider) = existing_provider() else {
        warn!("Camera provider not acquired yet, binder idle");
        return;
    };

    loop {
        if output.is_closed() {
            break;
        }

        let (sender, receiver) = mpsc::channel(pipeline::FRAME_CHANNEL_CAPACITY);
        let facing = request.facing;
        let bound = tokio::task::spawn_blocking(move || {
            let device = provider
                .camera_for(facing)
                .map_err(|_| CameraError::NoDeviceForSelection(facing.to_string()))?;
            let options = PreviewOptions {
                rotation: device.rotation,
                mirror,
            };
            provider
                .bind(&device, options, sender)
                .map_err(CameraError::from)
        })
        .await
        .unwrap_or_else(|e| Err(CameraError::BindFailed(format!("Bind task failed: {}", e))));

        match bound {
            Ok(guard) => {
                info!(device = %guard.device().name, generation = guard.generation(), "Session bound");
                if output
                    .send(Message::SessionBound(guard.device().clone()))
                    .await
                    .is_err()
                {
                    break;
                }

                match forward_frames(receiver, &mut output).await {
                    SessionEnd::Cancelled => {
                        release(guard).await;
                        break;
                    }
                    SessionEnd::StreamEnded => {
                        warn!("Preview stream ended, rebinding");
                        release(guard).await;
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to bind camera session");
                if output.send(Message::BindFailed(e.to_string())).await.is_err() {
                    break;
                }
                info!(retry_in = ?timing::BIND_RETRY, "Waiting before retry");
            }
        }

        tokio::time::sleep(timing::BIND_RETRY).await;
    }

    info!("Camera session binder stopped");
}

/// Forward preview frames to the UI until either side goes away
async fn forward_frames(
    mut receiver: mpsc::Receiver<crate::backends::camera::types::CameraFrame>,
    output: &mut mpsc::Sender<Message>,
) -> SessionEnd {
    let mut frame_count = 0u64;

    loop {
        if output.is_closed() {
            return SessionEnd::Cancelled;
        }

        // Short timeout so a dropped subscription is noticed promptly
        match tokio::time::timeout(timing::FRAME_POLL, receiver.next()).await {
            Ok(Some(frame)) => {
                frame_count += 1;
                if frame_count % timing::FRAME_LOG_INTERVAL == 0 {
                    info!(
                        frame = frame_count,
                        width = frame.width,
                        height = frame.height,
                        latency_ms = frame.captured_at.elapsed().as_secs_f64() * 1000.0,
                        "Received frame from pipeline"
                    );
                }

                // Dropping frames is fine for live preview
                if let Err(e) = output.try_send(Message::CameraFrame(Arc::new(frame))) {
                    if e.is_disconnected() {
                        return SessionEnd::Cancelled;
                    }
                    tracing::debug!(frame = frame_count, "Frame dropped (UI channel full)");
                }
            }
            Ok(None) => return SessionEnd::StreamEnded,
            Err(_) => continue,
        }
    }
}

/// Drop the guard off the async runtime; unbinding waits on GStreamer
async fn release(guard: SessionGuard) {
    if let Err(e) = tokio::task::spawn_blocking(move || drop(guard)).await {
        error!(error = %e, "Session release task failed");
    }
}
