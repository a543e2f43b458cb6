// SPDX-License-Identifier: GPL-3.0-only

//! Backend layer for camera and audio capture
//!
//! - [`audio`]: microphone discovery via PipeWire
//! - [`camera`]: camera discovery, the process-wide provider and preview sessions
//! - [`pw_dump`]: shared access to the PipeWire object graph

pub mod audio;
pub mod camera;
pub mod pw_dump;
