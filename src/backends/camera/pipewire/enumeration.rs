// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire camera enumeration
//!
//! Cameras are read from a `pw-dump` snapshot. When the same sensor is
//! exposed both through libcamera and through a raw V4L2 node, only the
//! libcamera node is kept since it carries location and rotation.

use super::super::types::{CameraDevice, CameraLocation, SensorRotation};
use crate::backends::pw_dump;
use tracing::{debug, info, warn};

/// Enumerate cameras using PipeWire
///
/// Falls back to a single "Default Camera" that lets PipeWire auto-select
/// when the graph cannot be inspected, and to an empty list when
/// `pipewiresrc` itself is missing.
pub fn enumerate_pipewire_cameras() -> Vec<CameraDevice> {
    debug!("Attempting to enumerate cameras via PipeWire");

    if !is_pipewire_available() {
        warn!("pipewiresrc not available");
        return Vec::new();
    }

    match pw_dump::snapshot() {
        Some(json) => {
            let cameras = parse_video_sources(&json);
            info!(count = cameras.len(), "PipeWire cameras enumerated");
            cameras
        }
        None => {
            info!("Using PipeWire auto-selection (default camera)");
            vec![CameraDevice::default_camera()]
        }
    }
}

/// Camera nodes in a pw-dump snapshot, in graph order
pub fn parse_video_sources(json: &str) -> Vec<CameraDevice> {
    let objects = pw_dump::objects(json);

    let mut nodes: Vec<(bool, CameraDevice)> = objects
        .iter()
        .filter_map(|object| {
            let props = pw_dump::node_props(object)?;
            if pw_dump::prop_string(props, "media.class").as_deref() != Some("Video/Source") {
                return None;
            }
            if let Some(role) = pw_dump::prop_string(props, "media.role")
                && role != "Camera"
            {
                return None;
            }

            let serial = pw_dump::prop_string(props, "object.serial")?;
            let name = pw_dump::prop_string(props, "node.description")
                .or_else(|| pw_dump::prop_string(props, "node.nick"))
                .or_else(|| pw_dump::prop_string(props, "node.name"))
                .unwrap_or_else(|| format!("Camera {}", serial));

            let location = pw_dump::prop_string(props, "api.libcamera.location");
            let rotation = pw_dump::prop_string(props, "api.libcamera.rotation");
            let is_libcamera = location.is_some()
                || rotation.is_some()
                || pw_dump::prop_string(props, "device.api").as_deref() == Some("libcamera");

            let device = CameraDevice {
                name,
                path: format!("pipewire-serial-{}", serial),
                node_id: object.get("id").map(|id| id.to_string()),
                location: location
                    .as_deref()
                    .map(CameraLocation::from_property)
                    .unwrap_or_default(),
                rotation: rotation
                    .as_deref()
                    .map(SensorRotation::from_degrees)
                    .unwrap_or_default(),
            };
            Some((is_libcamera, device))
        })
        .collect();

    if nodes.iter().any(|(is_libcamera, _)| *is_libcamera) {
        nodes.retain(|(is_libcamera, _)| *is_libcamera);
    }

    nodes
        .into_iter()
        .map(|(_, device)| {
            debug!(
                name = %device.name,
                path = %device.path,
                location = %device.location,
                rotation = %device.rotation,
                "Found camera"
            );
            device
        })
        .collect()
}

/// Test if PipeWire is available and working
fn is_pipewire_available() -> bool {
    if gstreamer::init().is_err() {
        return false;
    }

    gstreamer::ElementFactory::make("pipewiresrc")
        .build()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHONE: &str = r#"[
        {"id": 50, "type": "PipeWire:Interface:Node",
         "info": {"props": {"media.class": "Video/Source", "media.role": "Camera",
                            "node.description": "ov8858 (raw)", "object.serial": 60,
                            "device.api": "v4l2"}}},
        {"id": 51, "type": "PipeWire:Interface:Node",
         "info": {"props": {"media.class": "Video/Source", "media.role": "Camera",
                            "node.description": "Back Camera", "object.serial": 61,
                            "api.libcamera.location": "back", "api.libcamera.rotation": "90"}}},
        {"id": 52, "type": "PipeWire:Interface:Node",
         "info": {"props": {"media.class": "Video/Source", "media.role": "Camera",
                            "node.description": "Front Camera", "object.serial": "62",
                            "api.libcamera.location": "front", "api.libcamera.rotation": "270"}}},
        {"id": 53, "type": "PipeWire:Interface:Node",
         "info": {"props": {"media.class": "Video/Source", "media.role": "Screen",
                            "node.name": "screencast", "object.serial": 63}}}
    ]"#;

    const LAPTOP: &str = r#"[
        {"id": 70, "type": "PipeWire:Interface:Node",
         "info": {"props": {"media.class": "Video/Source", "node.nick": "Integrated Webcam",
                            "object.serial": 80}}}
    ]"#;

    #[test]
    fn libcamera_nodes_shadow_raw_nodes() {
        let cameras = parse_video_sources(PHONE);
        assert_eq!(cameras.len(), 2);
        assert_eq!(cameras[0].name, "Back Camera");
        assert_eq!(cameras[0].path, "pipewire-serial-61");
        assert_eq!(cameras[0].location, CameraLocation::Back);
        assert_eq!(cameras[0].rotation, SensorRotation::Rotate90);
        assert_eq!(cameras[1].location, CameraLocation::Front);
        assert_eq!(cameras[1].node_id.as_deref(), Some("52"));
    }

    #[test]
    fn plain_webcams_are_listed() {
        let cameras = parse_video_sources(LAPTOP);
        assert_eq!(cameras.len(), 1);
        assert_eq!(cameras[0].name, "Integrated Webcam");
        assert_eq!(cameras[0].location, CameraLocation::Unknown);
        assert_eq!(cameras[0].target_object(), Some("80"));
    }

    #[test]
    fn screen_sources_are_ignored() {
        assert!(
            parse_video_sources(PHONE)
                .iter()
                .all(|c| c.name != "screencast")
        );
    }
}
