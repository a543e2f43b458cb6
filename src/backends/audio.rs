// SPDX-License-Identifier: GPL-3.0-only

//! Microphone discovery for PipeWire
//!
//! Recording only checks whether a microphone exists; it never asks for one.
//! Without a source the video is recorded silently.

use super::pw_dump;
use tracing::debug;

/// An audio input device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    pub name: String,
    pub serial: String,
    pub node_name: String,
    pub is_default: bool,
}

/// Audio sources in a pw-dump snapshot, default source first
pub fn parse_audio_sources(json: &str) -> Vec<AudioDevice> {
    let objects = pw_dump::objects(json);
    let default_name = pw_dump::default_node_name(
        &objects,
        &["default.audio.source", "default.configured.audio.source"],
    );

    let mut devices: Vec<AudioDevice> = objects
        .iter()
        .filter_map(pw_dump::node_props)
        .filter(|props| {
            pw_dump::prop_string(props, "media.class").as_deref() == Some("Audio/Source")
        })
        .map(|props| {
            let node_name = pw_dump::prop_string(props, "node.name").unwrap_or_default();
            let name = pw_dump::prop_string(props, "node.nick")
                .or_else(|| pw_dump::prop_string(props, "node.description"))
                .unwrap_or_else(|| node_name.clone());
            let is_default = default_name.as_deref() == Some(node_name.as_str());

            AudioDevice {
                name,
                serial: pw_dump::prop_string(props, "object.serial").unwrap_or_default(),
                node_name,
                is_default,
            }
        })
        .collect();

    devices.sort_by(|a, b| b.is_default.cmp(&a.is_default).then(a.name.cmp(&b.name)));

    for dev in &devices {
        debug!(name = %dev.name, serial = %dev.serial, default = dev.is_default, "Found audio input device");
    }
    devices
}

/// Enumerate available audio input devices
pub fn enumerate_audio_devices() -> Vec<AudioDevice> {
    pw_dump::snapshot()
        .map(|json| parse_audio_sources(&json))
        .unwrap_or_default()
}

/// The microphone a recording would use, if any is present right now
pub fn available_microphone() -> Option<AudioDevice> {
    enumerate_audio_devices().into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"[
        {"id": 30, "type": "PipeWire:Interface:Metadata",
         "props": {"metadata.name": "default"},
         "metadata": [
            {"subject": 0, "key": "default.audio.sink", "value": {"name": "speaker"}},
            {"subject": 0, "key": "default.audio.source", "value": {"name": "alsa_input.mic"}}
         ]},
        {"id": 41, "type": "PipeWire:Interface:Node",
         "info": {"props": {"media.class": "Audio/Source", "node.name": "alsa_input.usb",
                            "node.description": "USB Headset", "object.serial": 88}}},
        {"id": 42, "type": "PipeWire:Interface:Node",
         "info": {"props": {"media.class": "Audio/Source", "node.name": "alsa_input.mic",
                            "node.nick": "Built-in Mic", "object.serial": "91"}}},
        {"id": 43, "type": "PipeWire:Interface:Node",
         "info": {"props": {"media.class": "Audio/Sink", "node.name": "speaker"}}}
    ]"#;

    #[test]
    fn default_source_sorts_first() {
        let devices = parse_audio_sources(SNAPSHOT);
        assert_eq!(devices.len(), 2, "sinks must be ignored");
        assert_eq!(devices[0].name, "Built-in Mic");
        assert!(devices[0].is_default);
        assert_eq!(devices[0].serial, "91");
    }

    #[test]
    fn numeric_serials_are_read() {
        let devices = parse_audio_sources(SNAPSHOT);
        assert_eq!(devices[1].serial, "88");
        assert_eq!(devices[1].name, "USB Headset");
    }

    #[test]
    fn garbage_yields_no_devices() {
        assert!(parse_audio_sources("not json").is_empty());
        assert!(parse_audio_sources("[]").is_empty());
    }
}
