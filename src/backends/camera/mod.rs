// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │   UI Layer (App)    │
//! └──────────┬──────────┘
//!            │  camera_provider()  (process-wide, created once)
//!            ▼
//! ┌─────────────────────┐
//! │ CameraBackendManager│  ← bind/unbind, session generations
//! └──────────┬──────────┘
//!            ▼
//! ┌─────────────────────┐
//! │  CameraBackend Trait│
//! └──────────┬──────────┘
//!            ▼
//!       ┌────────┐
//!       │PipeWire│
//!       └────────┘
//! ```

pub mod manager;
pub mod pipewire;
pub mod types;

pub use manager::{CameraBackendManager, SessionGuard};
pub use types::*;

use crate::permissions::PipeWireRemote;
use tokio::sync::OnceCell;
use tracing::info;

/// Camera backend trait
///
/// A backend owns at most one bound preview session. Binding a new session
/// replaces the previous one.
pub trait CameraBackend: Send + Sync {
    /// Enumerate available cameras
    fn enumerate_cameras(&self) -> Vec<CameraDevice>;

    /// Start a preview session for `device`, delivering frames to `sender`
    fn bind(
        &mut self,
        device: &CameraDevice,
        options: PreviewOptions,
        sender: FrameSender,
    ) -> BackendResult<()>;

    /// Stop the bound session and release the camera
    fn unbind(&mut self) -> BackendResult<()>;

    fn is_bound(&self) -> bool;

    /// PipeWire remote granted by the camera portal, if any
    fn remote(&self) -> Option<&PipeWireRemote>;
}

/// Pick the camera for a facing selection
///
/// A camera whose reported location matches wins. Otherwise the first
/// enumerated camera serves as the back camera and the second as the front
/// one, falling back to the first when there is no second.
pub fn resolve_facing(cameras: &[CameraDevice], facing: Facing) -> Option<&CameraDevice> {
    if let Some(camera) = cameras
        .iter()
        .find(|camera| camera.location.facing() == Some(facing))
    {
        return Some(camera);
    }

    let index = match facing {
        Facing::Back => 0,
        Facing::Front => 1,
    };
    cameras.get(index).or_else(|| cameras.first())
}

static PROVIDER: OnceCell<CameraBackendManager> = OnceCell::const_new();

/// The process-wide camera provider, created on first use
///
/// Later calls return the same instance and ignore `remote`.
pub async fn camera_provider(
    remote: Option<PipeWireRemote>,
) -> BackendResult<&'static CameraBackendManager> {
    PROVIDER
        .get_or_try_init(|| async move {
            info!(portal = remote.is_some(), "Creating camera provider");
            tokio::task::spawn_blocking(move || CameraBackendManager::new(remote))
                .await
                .map_err(|e| BackendError::Other(format!("Provider task failed: {}", e)))?
        })
        .await
}

/// The provider, if it has been created already
pub fn existing_provider() -> Option<&'static CameraBackendManager> {
    PROVIDER.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(name: &str, location: CameraLocation) -> CameraDevice {
        CameraDevice {
            name: name.into(),
            path: format!("pipewire-serial-{}", name.len()),
            node_id: None,
            location,
            rotation: SensorRotation::None,
        }
    }

    #[test]
    fn location_match_wins() {
        let cameras = vec![
            camera("front", CameraLocation::Front),
            camera("back", CameraLocation::Back),
        ];
        assert_eq!(resolve_facing(&cameras, Facing::Back).map(|c| c.name.as_str()), Some("back"));
        assert_eq!(
            resolve_facing(&cameras, Facing::Front).map(|c| c.name.as_str()),
            Some("front")
        );
    }

    #[test]
    fn enumeration_order_without_locations() {
        let cameras = vec![
            camera("first", CameraLocation::Unknown),
            camera("second", CameraLocation::External),
        ];
        assert_eq!(
            resolve_facing(&cameras, Facing::Back).map(|c| c.name.as_str()),
            Some("first")
        );
        assert_eq!(
            resolve_facing(&cameras, Facing::Front).map(|c| c.name.as_str()),
            Some("second")
        );
    }

    #[test]
    fn single_camera_serves_both() {
        let cameras = vec![camera("only", CameraLocation::Back)];
        assert!(resolve_facing(&cameras, Facing::Front).is_some());
        assert!(resolve_facing(&cameras, Facing::Back).is_some());
    }

    #[test]
    fn unmatched_selection_uses_enumeration_order() {
        let cameras = vec![
            camera("wide", CameraLocation::Back),
            camera("tele", CameraLocation::Back),
        ];
        assert_eq!(
            resolve_facing(&cameras, Facing::Front).map(|c| c.name.as_str()),
            Some("tele")
        );

        let cameras = vec![
            camera("selfie", CameraLocation::Front),
            camera("usb", CameraLocation::Unknown),
        ];
        assert_eq!(
            resolve_facing(&cameras, Facing::Back).map(|c| c.name.as_str()),
            Some("selfie")
        );
    }

    #[test]
    fn no_cameras_resolves_to_none() {
        assert!(resolve_facing(&[], Facing::Back).is_none());
        assert!(resolve_facing(&[], Facing::Front).is_none());
    }
}
