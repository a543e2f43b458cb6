// SPDX-License-Identifier: GPL-3.0-only

//! Flash LED control via Linux sysfs
//!
//! LEDs are found at `/sys/class/leds/*:flash` and driven through their
//! `brightness` file, which `feedbackd` makes group-writable. The root-only
//! `flash_strobe` interface is never used: the capture flash is the torch
//! switched on for a short pre-flash window.

use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const LEDS_DIR: &str = "/sys/class/leds";

/// Flash setting for the next photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlashMode {
    #[default]
    Off,
    /// Fire the flash before the frame is taken
    On,
}

impl FlashMode {
    pub fn toggled(self) -> Self {
        match self {
            FlashMode::Off => FlashMode::On,
            FlashMode::On => FlashMode::Off,
        }
    }

    pub fn is_on(self) -> bool {
        self == FlashMode::On
    }
}

/// A writable flash LED
#[derive(Debug, Clone)]
pub struct FlashDevice {
    path: PathBuf,
    max_brightness: u32,
    name: String,
}

impl FlashDevice {
    /// Directory name, e.g. `white:flash`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set raw brightness (0 = off, max_brightness = full)
    pub fn set_brightness(&self, value: u32) -> io::Result<()> {
        let clamped = value.min(self.max_brightness);
        std::fs::write(self.path.join("brightness"), clamped.to_string())
    }

    pub fn off(&self) -> io::Result<()> {
        self.set_brightness(0)
    }

    pub fn full(&self) -> io::Result<()> {
        self.set_brightness(self.max_brightness)
    }
}

/// Result of flash LED detection
///
/// Keeps "hardware exists" apart from "we can control it" so the user can be
/// told how to fix group membership.
#[derive(Debug, Clone, Default)]
pub struct FlashHardware {
    pub devices: Vec<FlashDevice>,
    /// Set when LEDs exist but none is writable
    pub permission_error: Option<String>,
}

impl FlashHardware {
    pub fn detect() -> FlashHardware {
        Self::detect_in(Path::new(LEDS_DIR))
    }

    /// Scan `leds_dir` for `*:flash` entries
    pub fn detect_in(leds_dir: &Path) -> FlashHardware {
        let Ok(entries) = std::fs::read_dir(leds_dir) else {
            warn!(dir = %leds_dir.display(), "Cannot read LED directory, flash discovery skipped");
            return FlashHardware::default();
        };

        let mut devices = Vec::new();
        let mut unwritable: Vec<PathBuf> = Vec::new();

        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !name.ends_with(":flash") {
                continue;
            }

            let led_path = entry.path();
            let max_path = led_path.join("max_brightness");
            let max_brightness = match std::fs::read_to_string(&max_path)
                .ok()
                .and_then(|s| s.trim().parse::<u32>().ok())
            {
                Some(v) if v > 0 => v,
                _ => {
                    warn!(path = %max_path.display(), "Invalid or unreadable max_brightness");
                    continue;
                }
            };

            let brightness_path = led_path.join("brightness");
            match std::fs::OpenOptions::new()
                .write(true)
                .open(&brightness_path)
            {
                Ok(_) => {
                    info!(name, max_brightness, "Discovered flash LED");
                    devices.push(FlashDevice {
                        path: led_path,
                        max_brightness,
                        name: name.to_string(),
                    });
                }
                Err(e) => {
                    warn!(path = %brightness_path.display(), error = %e, "Flash LED found but not writable");
                    unwritable.push(brightness_path);
                }
            }
        }

        // white before yellow
        devices.sort_by(|a, b| a.name.cmp(&b.name));

        let permission_error = if devices.is_empty() && !unwritable.is_empty() {
            Some(permission_hint(&unwritable))
        } else {
            None
        };

        FlashHardware {
            devices,
            permission_error,
        }
    }

    pub fn has_devices(&self) -> bool {
        !self.devices.is_empty()
    }

    /// Drive every LED for the torch state
    pub fn set_torch(&self, on: bool) {
        if on {
            all_on(&self.devices);
        } else {
            all_off(&self.devices);
        }
    }
}

/// How to gain write access, naming the group that owns the LED files
fn permission_hint(unwritable: &[PathBuf]) -> String {
    let username = std::env::var("USER").unwrap_or_else(|_| "user".to_string());
    let tool = if Path::new("/usr/bin/doas").exists() {
        "doas"
    } else {
        "sudo"
    };

    let group = unwritable
        .first()
        .and_then(|path| {
            let gid = std::fs::metadata(path).ok()?.gid();
            let groups = std::fs::read_to_string("/etc/group").ok()?;
            groups.lines().find_map(|line| {
                let mut parts = line.split(':');
                let name = parts.next()?;
                let id = parts.nth(1)?.parse::<u32>().ok()?;
                (id == gid).then(|| name.to_string())
            })
        })
        .unwrap_or_else(|| "feedbackd".to_string());

    format!("{tool} adduser {username} {group}")
}

/// Turn on all flash devices at full brightness
pub fn all_on(devices: &[FlashDevice]) {
    for dev in devices {
        if let Err(e) = dev.full() {
            warn!(device = %dev.name, error = %e, "Failed to turn on flash LED");
        }
    }
}

/// Turn off all flash devices
pub fn all_off(devices: &[FlashDevice]) {
    for dev in devices {
        if let Err(e) = dev.off() {
            warn!(device = %dev.name, error = %e, "Failed to turn off flash LED");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_leds() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("kameraku-leds-{}", uuid::Uuid::new_v4()));
        for (name, max) in [("white:flash", "255"), ("red:status", "1"), ("broken:flash", "0")] {
            let led = dir.join(name);
            std::fs::create_dir_all(&led).expect("create led dir");
            std::fs::write(led.join("max_brightness"), max).expect("write max");
            std::fs::write(led.join("brightness"), "0").expect("write brightness");
        }
        dir
    }

    #[test]
    fn flash_mode_toggles_between_two_values() {
        assert_eq!(FlashMode::default(), FlashMode::Off);
        assert_eq!(FlashMode::Off.toggled(), FlashMode::On);
        assert_eq!(FlashMode::On.toggled(), FlashMode::Off);
    }

    #[test]
    fn only_valid_flash_leds_are_found() {
        let dir = fake_leds();
        let hardware = FlashHardware::detect_in(&dir);
        assert_eq!(hardware.devices.len(), 1);
        assert_eq!(hardware.devices[0].name(), "white:flash");
        assert!(hardware.permission_error.is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn torch_writes_brightness() {
        let dir = fake_leds();
        let hardware = FlashHardware::detect_in(&dir);
        let brightness = dir.join("white:flash").join("brightness");

        hardware.set_torch(true);
        assert_eq!(std::fs::read_to_string(&brightness).ok().as_deref(), Some("255"));
        hardware.set_torch(false);
        assert_eq!(std::fs::read_to_string(&brightness).ok().as_deref(), Some("0"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_directory_means_no_hardware() {
        let hardware = FlashHardware::detect_in(Path::new("/nonexistent/leds"));
        assert!(!hardware.has_devices());
    }
}
