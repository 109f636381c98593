//! Audio module for Windows Core Audio API interactions.
//!
//! The platform-neutral half (`backend`, `device`, `events`, `handle`,
//! `resolver`) defines how the mute logic sees the audio service. The
//! Windows half (`enumerator`, `notifications`, `volume`) implements it on
//! top of MMDevice and IAudioEndpointVolume.

pub mod backend;
pub mod device;
pub mod events;
pub mod handle;
pub mod resolver;

#[cfg(windows)]
pub mod enumerator;
#[cfg(windows)]
pub mod notifications;
#[cfg(windows)]
pub mod volume;

#[cfg(test)]
pub(crate) mod fake;

pub use backend::{AudioBackend, CaptureEndpoint, Subscription};
pub use device::{AudioError, AudioEvent, DeviceRole, DeviceState};
pub use events::{event_channel, AudioEventSender};
pub use handle::DeviceHandle;
pub use resolver::DefaultDeviceResolver;

#[cfg(windows)]
pub use enumerator::{ComGuard, DeviceEnumerator};
