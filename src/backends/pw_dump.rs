// SPDX-License-Identifier: GPL-3.0-only

//! Snapshot of the PipeWire object graph as reported by `pw-dump`

use serde_json::Value;
use std::process::Command;
use tracing::warn;

/// Run `pw-dump` and return its JSON output
pub fn snapshot() -> Option<String> {
    let output = match Command::new("pw-dump").output() {
        Ok(output) => output,
        Err(e) => {
            warn!(error = %e, "Failed to run pw-dump");
            return None;
        }
    };

    if !output.status.success() {
        warn!(status = ?output.status, "pw-dump command failed");
        return None;
    }

    match String::from_utf8(output.stdout) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(error = %e, "pw-dump output is not UTF-8");
            None
        }
    }
}

/// Parse a snapshot into its list of objects
pub fn objects(json: &str) -> Vec<Value> {
    match serde_json::from_str::<Vec<Value>>(json) {
        Ok(objects) => objects,
        Err(e) => {
            warn!(error = %e, "Failed to parse JSON from pw-dump");
            Vec::new()
        }
    }
}

/// Properties of a node object, if it is one
pub fn node_props(object: &Value) -> Option<&serde_json::Map<String, Value>> {
    if object.get("type").and_then(Value::as_str) != Some("PipeWire:Interface:Node") {
        return None;
    }
    object.get("info")?.get("props")?.as_object()
}

/// Read a property as text; pw-dump emits some values as numbers
pub fn prop_string(props: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match props.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Name of the default node for a metadata key such as `default.audio.source`
pub fn default_node_name(objects: &[Value], keys: &[&str]) -> Option<String> {
    let metadata = objects.iter().find(|object| {
        object.get("type").and_then(Value::as_str) == Some("PipeWire:Interface:Metadata")
            && object
                .get("props")
                .and_then(|p| p.get("metadata.name"))
                .and_then(Value::as_str)
                == Some("default")
    })?;

    metadata
        .get("metadata")?
        .as_array()?
        .iter()
        .filter(|entry| {
            entry
                .get("key")
                .and_then(Value::as_str)
                .is_some_and(|k| keys.contains(&k))
        })
        .find_map(|entry| {
            entry
                .get("value")?
                .get("name")?
                .as_str()
                .map(str::to_string)
        })
}
