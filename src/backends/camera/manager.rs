// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend lifecycle manager
//!
//! The manager provides:
//! - Thread-safe backend access
//! - Session generations, so a stale session cannot tear down a newer one

use super::pipewire::PipeWireBackend;
use super::types::*;
use super::{CameraBackend, resolve_facing};
use crate::permissions::PipeWireRemote;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Internal manager state
struct ManagerState {
    backend: Box<dyn CameraBackend>,
    /// Incremented on every successful bind
    generation: u64,
}

/// Camera backend manager
///
/// Thread-safe and can be shared across threads.
#[derive(Clone)]
pub struct CameraBackendManager {
    state: Arc<Mutex<ManagerState>>,
}

impl CameraBackendManager {
    /// Create a manager over the PipeWire backend
    pub fn new(remote: Option<PipeWireRemote>) -> BackendResult<Self> {
        gstreamer::init().map_err(|e| BackendError::NotAvailable(e.to_string()))?;
        Ok(Self::with_backend(Box::new(PipeWireBackend::new(remote))))
    }

    /// Create a manager over an arbitrary backend
    pub fn with_backend(backend: Box<dyn CameraBackend>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ManagerState {
                backend,
                generation: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ManagerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enumerate available cameras
    pub fn enumerate_cameras(&self) -> BackendResult<Vec<CameraDevice>> {
        let cameras = self.lock().backend.enumerate_cameras();
        if cameras.is_empty() {
            Err(BackendError::DeviceNotFound("No cameras found".to_string()))
        } else {
            Ok(cameras)
        }
    }

    /// Camera that would serve `facing` right now
    pub fn camera_for(&self, facing: Facing) -> BackendResult<CameraDevice> {
        let cameras = self.enumerate_cameras()?;
        resolve_facing(&cameras, facing)
            .cloned()
            .ok_or_else(|| BackendError::DeviceNotFound(format!("No {} camera", facing)))
    }

    /// Unbind whatever is bound, then bind a preview session to `device`
    ///
    /// The returned guard unbinds the session when dropped, unless a newer
    /// session has been bound in the meantime.
    pub fn bind(
        &self,
        device: &CameraDevice,
        options: PreviewOptions,
        sender: FrameSender,
    ) -> BackendResult<SessionGuard> {
        let mut state = self.lock();
        if let Err(e) = state.backend.unbind() {
            warn!(error = %e, "Failed to unbind previous session");
        }

        state.backend.bind(device, options, sender)?;
        state.generation += 1;
        info!(device = %device.name, generation = state.generation, "Session bound");

        Ok(SessionGuard {
            manager: self.clone(),
            generation: state.generation,
            device: device.clone(),
        })
    }

    fn unbind_generation(&self, generation: u64) {
        let mut state = self.lock();
        if state.generation != generation {
            debug!(
                stale = generation,
                current = state.generation,
                "Skipping unbind of superseded session"
            );
            return;
        }
        if let Err(e) = state.backend.unbind() {
            warn!(error = %e, "Failed to unbind session");
        }
    }

    pub fn is_bound(&self) -> bool {
        self.lock().backend.is_bound()
    }

    /// Portal remote the backend connects through
    pub fn remote(&self) -> Option<PipeWireRemote> {
        self.lock().backend.remote().cloned()
    }
}

/// Handle on a bound preview session
pub struct SessionGuard {
    manager: CameraBackendManager,
    generation: u64,
    device: CameraDevice,
}

impl SessionGuard {
    pub fn device(&self) -> &CameraDevice {
        &self.device
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.manager.unbind_generation(self.generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counters {
        binds: AtomicUsize,
        unbinds: AtomicUsize,
    }

    struct FakeBackend {
        cameras: Vec<CameraDevice>,
        bound: Option<CameraDevice>,
        counters: Arc<Counters>,
    }

    impl CameraBackend for FakeBackend {
        fn enumerate_cameras(&self) -> Vec<CameraDevice> {
            self.cameras.clone()
        }

        fn bind(
            &mut self,
            device: &CameraDevice,
            _options: PreviewOptions,
            _sender: FrameSender,
        ) -> BackendResult<()> {
            self.counters.binds.fetch_add(1, Ordering::SeqCst);
            self.bound = Some(device.clone());
            Ok(())
        }

        fn unbind(&mut self) -> BackendResult<()> {
            if self.bound.take().is_some() {
                self.counters.unbinds.fetch_add(1, Ordering::SeqCst);
            }
            Ok(())
        }

        fn is_bound(&self) -> bool {
            self.bound.is_some()
        }

        fn remote(&self) -> Option<&PipeWireRemote> {
            None
        }
    }

    fn manager(cameras: Vec<CameraDevice>) -> (CameraBackendManager, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let backend = FakeBackend {
            cameras,
            bound: None,
            counters: Arc::clone(&counters),
        };
        (CameraBackendManager::with_backend(Box::new(backend)), counters)
    }

    fn sender() -> FrameSender {
        cosmic::iced::futures::channel::mpsc::channel(1).0
    }

    #[test]
    fn rebinding_supersedes_old_guard() {
        let device = CameraDevice::default_camera();
        let (manager, counters) = manager(vec![device.clone()]);

        let first = manager
            .bind(&device, PreviewOptions::default(), sender())
            .expect("first bind");
        let second = manager
            .bind(&device, PreviewOptions::default(), sender())
            .expect("second bind");
        assert_eq!(counters.unbinds.load(Ordering::SeqCst), 1);

        drop(first);
        assert!(manager.is_bound(), "stale guard must not unbind the new session");

        drop(second);
        assert!(!manager.is_bound());
        assert_eq!(counters.binds.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn empty_enumeration_is_an_error() {
        let (manager, _) = manager(Vec::new());
        assert!(matches!(
            manager.camera_for(Facing::Back),
            Err(BackendError::DeviceNotFound(_))
        ));
    }
}
