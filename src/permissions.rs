// SPDX-License-Identifier: GPL-3.0-only

//! Camera access through the XDG Camera portal
//!
//! Access is requested once at startup. A grant comes with a PipeWire remote
//! (a socket fd) that only exposes the cameras, and every pipeline connects
//! through it. Outside a sandbox a missing portal is not fatal: the default
//! PipeWire connection is used instead.

use crate::errors::PermissionError;
use futures::StreamExt;
use std::collections::HashMap;
use std::os::fd::{AsRawFd, OwnedFd, RawFd};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

const PORTAL_DESTINATION: &str = "org.freedesktop.portal.Desktop";
const PORTAL_PATH: &str = "/org/freedesktop/portal/desktop";
const CAMERA_INTERFACE: &str = "org.freedesktop.portal.Camera";
const REQUEST_INTERFACE: &str = "org.freedesktop.portal.Request";

/// PipeWire connection handed out by the portal
#[derive(Debug, Clone)]
pub struct PipeWireRemote(Arc<OwnedFd>);

impl PipeWireRemote {
    pub fn new(fd: OwnedFd) -> Self {
        Self(Arc::new(fd))
    }

    /// Descriptor for `pipewiresrc`'s `fd` property
    pub fn raw_fd(&self) -> RawFd {
        self.0.as_raw_fd()
    }
}

/// Where the camera permission stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CameraPermission {
    #[default]
    Pending,
    Granted,
    Denied(PermissionError),
}

impl CameraPermission {
    pub fn is_granted(&self) -> bool {
        matches!(self, CameraPermission::Granted)
    }
}

/// Whether the process runs inside a Flatpak sandbox
pub fn is_sandboxed() -> bool {
    Path::new("/.flatpak-info").exists()
}

/// Object path of the `Request` the portal creates for `token`
///
/// The sender part is the connection's unique name without the leading
/// colon and with dots replaced by underscores.
pub fn request_path(unique_name: &str, token: &str) -> String {
    let sender = unique_name.trim_start_matches(':').replace('.', "_");
    format!("{}/request/{}/{}", PORTAL_PATH, sender, token)
}

/// Map a `Request.Response` code to the permission outcome
pub fn response_outcome(code: u32) -> Result<(), PermissionError> {
    match code {
        0 => Ok(()),
        1 => Err(PermissionError::Cancelled),
        _ => Err(PermissionError::Denied),
    }
}

enum PortalFailure {
    /// No portal, no camera interface, or the bus itself failed
    Unreachable(String),
    /// The portal answered and said no
    Refused(PermissionError),
}

impl From<zbus::Error> for PortalFailure {
    fn from(err: zbus::Error) -> Self {
        PortalFailure::Unreachable(err.to_string())
    }
}

/// Ask for camera access, blocking until the user answers
///
/// Returns the portal's PipeWire remote, or `None` when the default
/// PipeWire connection should be used.
pub async fn request_camera_access() -> Result<Option<PipeWireRemote>, PermissionError> {
    match access_through_portal().await {
        Ok(remote) => {
            info!("Camera access granted by portal");
            Ok(Some(remote))
        }
        Err(PortalFailure::Refused(reason)) => {
            warn!(%reason, "Camera access refused");
            Err(reason)
        }
        Err(PortalFailure::Unreachable(msg)) if is_sandboxed() => {
            warn!(error = %msg, "Camera portal unreachable inside sandbox");
            Err(PermissionError::PortalUnavailable(msg))
        }
        Err(PortalFailure::Unreachable(msg)) => {
            info!(error = %msg, "Camera portal unreachable, using default PipeWire connection");
            Ok(None)
        }
    }
}

async fn access_through_portal() -> Result<PipeWireRemote, PortalFailure> {
    let connection = zbus::Connection::session().await?;
    let camera = zbus::Proxy::new(&connection, PORTAL_DESTINATION, PORTAL_PATH, CAMERA_INTERFACE)
        .await?;

    match camera.get_property::<bool>("IsCameraPresent").await {
        Ok(present) => debug!(present, "Portal camera presence"),
        Err(e) => return Err(PortalFailure::Unreachable(e.to_string())),
    }

    let unique_name = connection
        .unique_name()
        .map(|name| name.as_str().to_string())
        .ok_or_else(|| PortalFailure::Unreachable("No unique bus name".to_string()))?;
    let token = format!("kameraku_{}", uuid::Uuid::new_v4().simple());
    let path = request_path(&unique_name, &token);

    // Subscribe before calling so the response cannot be missed
    let request =
        zbus::Proxy::new(&connection, PORTAL_DESTINATION, path.clone(), REQUEST_INTERFACE).await?;
    let mut responses = request.receive_signal("Response").await?;

    let mut options: HashMap<&str, Value<'_>> = HashMap::new();
    options.insert("handle_token", Value::from(token.as_str()));
    let handle: OwnedObjectPath = camera.call("AccessCamera", &(options,)).await?;
    if handle.as_str() != path {
        debug!(expected = %path, actual = %handle.as_str(), "Portal returned a different request path");
    }

    let message = responses
        .next()
        .await
        .ok_or_else(|| PortalFailure::Unreachable("Response stream ended".to_string()))?;
    let (code, _results): (u32, HashMap<String, OwnedValue>) = message.body().deserialize()?;
    debug!(code, "Portal access response");
    response_outcome(code).map_err(PortalFailure::Refused)?;

    let no_options: HashMap<&str, Value<'_>> = HashMap::new();
    let fd: zbus::zvariant::OwnedFd = camera.call("OpenPipeWireRemote", &(no_options,)).await?;
    Ok(PipeWireRemote::new(OwnedFd::from(fd)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_path_escapes_unique_name() {
        assert_eq!(
            request_path(":1.42", "kameraku_abc"),
            "/org/freedesktop/portal/desktop/request/1_42/kameraku_abc"
        );
    }

    #[test]
    fn response_codes_map_to_outcomes() {
        assert_eq!(response_outcome(0), Ok(()));
        assert_eq!(response_outcome(1), Err(PermissionError::Cancelled));
        assert_eq!(response_outcome(2), Err(PermissionError::Denied));
    }

    #[test]
    fn only_granted_counts() {
        assert!(CameraPermission::Granted.is_granted());
        assert!(!CameraPermission::Pending.is_granted());
        assert!(!CameraPermission::Denied(PermissionError::Denied).is_granted());
    }
}
