// SPDX-License-Identifier: GPL-3.0-only

//! Processing pipelines for photo and video capture
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │ Preview Frame│ ──▶ │  Photo Pipeline   │ ──▶ │  JPEG File   │
//! │   (RGBA)     │     │  - unmirror, RGB  │     │              │
//! │              │     │  - JPEG encoding  │     │              │
//! └──────────────┘     └───────────────────┘     └──────────────┘
//!
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │ Camera Node  │ ──▶ │  Video Pipeline   │ ──▶ │   MP4 File   │
//! │  (PipeWire)  │     │  - H.264 encoding │     │              │
//! │              │     │  - Audio muxing   │     │              │
//! └──────────────┘     └───────────────────┘     └──────────────┘
//! ```
//!
//! Heavy work runs off the UI thread so the preview never freezes.

pub mod photo;
pub mod video;
