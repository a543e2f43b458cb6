// SPDX-License-Identifier: GPL-3.0-only

//! Video recording pipeline
//!
//! - Picks the best available H.264 encoder (hardware preferred)
//! - Keeps the preview running during recording
//! - Adds audio when a microphone is present

pub mod encoder_selection;
pub mod muxer;
pub mod recorder;

pub use recorder::{RecordingOutcome, VideoRecorder};
