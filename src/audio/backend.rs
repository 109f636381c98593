//! Seams between the mute logic and the OS audio service.
//!
//! The Windows implementation lives in [`super::enumerator`] and
//! [`super::volume`]; tests use an in-memory backend.

use super::device::{AudioError, DeviceRole};
use super::events::AudioEventSender;
use std::fmt;

/// The OS audio service as seen by the resolver.
pub trait AudioBackend {
    type Endpoint: CaptureEndpoint;

    /// Look up the default capture endpoint for `role`.
    ///
    /// `Ok(None)` means the OS reports no such device.
    fn default_capture_endpoint(
        &self,
        role: DeviceRole,
    ) -> Result<Option<Self::Endpoint>, AudioError>;
}

/// One capture endpoint with hardware mute control.
pub trait CaptureEndpoint {
    /// Opaque OS device id.
    fn id(&self) -> &str;

    /// Friendly name for display.
    fn name(&self) -> &str;

    /// Read the hardware mute flag.
    fn mute(&self) -> Result<bool, AudioError>;

    /// Write the hardware mute flag.
    fn set_mute(&self, muted: bool) -> Result<(), AudioError>;

    /// Attach a mute-change listener. Every notification is delivered as
    /// [`AudioEvent::MuteChanged`](super::AudioEvent::MuteChanged) tagged with
    /// `generation`. The listener stays attached until the returned
    /// [`Subscription`] is released or dropped.
    fn subscribe(
        &self,
        generation: u64,
        events: AudioEventSender,
    ) -> Result<Subscription, AudioError>;
}

/// A live notification subscription. Detaches on release or drop.
#[must_use = "dropping a Subscription detaches it immediately"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new<F>(detach: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// Detach now.
    pub fn release(mut self) {
        self.detach_once();
    }

    fn detach_once(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach_once();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("live", &self.detach.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn subscription_detaches_exactly_once() {
        let detached = Rc::new(Cell::new(0));

        let count = Rc::clone(&detached);
        let sub = Subscription::new(move || count.set(count.get() + 1));
        sub.release();
        assert_eq!(detached.get(), 1);

        let count = Rc::clone(&detached);
        {
            let _sub = Subscription::new(move || count.set(count.get() + 1));
        }
        assert_eq!(detached.get(), 2);
    }
}
