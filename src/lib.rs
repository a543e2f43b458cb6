// SPDX-License-Identifier: GPL-3.0-only

//! KameraKu - a single-screen camera for taking photos and recording videos
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Main application logic and UI
//! - [`permissions`]: Camera access through the desktop portal
//! - [`backends`]: Camera provider, PipeWire sessions and audio probing
//! - [`pipelines`]: Photo and video capture pipelines
//! - [`flash`]: Flash/torch LED control
//! - [`config`]: User configuration handling
//! - [`storage`]: Output locations and thumbnail loading
//!
//! # Example
//!
//! ```ignore
//! // This is a GUI application, typically run via:
//! // kameraku
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod flash;
pub mod i18n;
pub mod permissions;
pub mod pipelines;
pub mod storage;

// Re-export commonly used types
pub use app::{AppModel, Message};
pub use config::Config;
pub use constants::BitratePreset;
