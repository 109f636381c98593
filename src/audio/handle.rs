//! The binding between the controller and one physical capture device.

use super::backend::{CaptureEndpoint, Subscription};
use super::device::AudioError;
use super::events::AudioEventSender;

/// An owned binding to one capture device plus its mute-notification
/// subscription.
///
/// The subscription is detached before the endpoint is released, both on
/// [`DeviceHandle::release`] and on drop, so no notification can target a
/// disposed endpoint.
pub struct DeviceHandle<E: CaptureEndpoint> {
    subscription: Option<Subscription>,
    endpoint: E,
    generation: u64,
}

impl<E: CaptureEndpoint> DeviceHandle<E> {
    /// Wrap a freshly resolved endpoint. `generation` must be unique per
    /// handle for the lifetime of the process.
    pub fn new(endpoint: E, generation: u64) -> Self {
        Self {
            subscription: None,
            endpoint,
            generation,
        }
    }

    pub fn id(&self) -> &str {
        self.endpoint.id()
    }

    pub fn name(&self) -> &str {
        self.endpoint.name()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether mute-change notifications are attached.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn mute(&self) -> Result<bool, AudioError> {
        self.endpoint.mute()
    }

    pub fn set_mute(&self, muted: bool) -> Result<(), AudioError> {
        self.endpoint.set_mute(muted)
    }

    /// Attach mute-change notifications. A handle holds at most one
    /// subscription, so calling this while subscribed does nothing.
    pub fn subscribe(&mut self, events: &AudioEventSender) -> Result<(), AudioError> {
        if self.subscription.is_some() {
            return Ok(());
        }
        let subscription = self.endpoint.subscribe(self.generation, events.clone())?;
        self.subscription = Some(subscription);
        Ok(())
    }

    /// Detach notifications and give up the device.
    pub fn release(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.release();
        }
    }
}

impl<E: CaptureEndpoint> Drop for DeviceHandle<E> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<E: CaptureEndpoint> std::fmt::Debug for DeviceHandle<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("generation", &self.generation)
            .field("subscribed", &self.is_subscribed())
            .finish()
    }
}
