//! Resolution of "the current microphone".

use super::backend::AudioBackend;
use super::device::DeviceRole;
use super::handle::DeviceHandle;
use tracing::{debug, warn};

/// Looks up the default communication capture device and wraps it in a
/// fresh [`DeviceHandle`].
pub struct DefaultDeviceResolver<B: AudioBackend> {
    backend: B,
    role: DeviceRole,
    next_generation: u64,
}

impl<B: AudioBackend> DefaultDeviceResolver<B> {
    /// Resolver for the Communications role (Teams, Zoom, Discord).
    pub fn new(backend: B) -> Self {
        Self::with_role(backend, DeviceRole::Communications)
    }

    pub fn with_role(backend: B, role: DeviceRole) -> Self {
        Self {
            backend,
            role,
            next_generation: 1,
        }
    }

    pub fn role(&self) -> DeviceRole {
        self.role
    }

    /// Resolve the current default device.
    ///
    /// Every failure (no device, query error, transient access fault) is
    /// reported as `None`; nothing here is fatal.
    pub fn resolve(&mut self) -> Option<DeviceHandle<B::Endpoint>> {
        match self.backend.default_capture_endpoint(self.role) {
            Ok(Some(endpoint)) => {
                let generation = self.next_generation;
                self.next_generation += 1;
                Some(DeviceHandle::new(endpoint, generation))
            }
            Ok(None) => {
                debug!(role = ?self.role, "no default capture device");
                None
            }
            Err(e) => {
                warn!(role = ?self.role, error = %e, "default capture device lookup failed");
                None
            }
        }
    }
}
