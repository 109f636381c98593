//! Mute state tracking for the default communication microphone.
//!
//! [`MuteStateController`] is the single owner of the bound device and of
//! the `is_muted` flag. Everything that changes either one goes through it
//! on the thread that owns it: hotkey and tray commands call it directly,
//! and audio-service callbacks reach it through the event queue drained by
//! [`MuteStateController::drain_events`].
//!
//! Commands only write the hardware flag. `is_muted` follows the mute
//! notifications that the hardware sends back, so the indicator always
//! reflects the device rather than what was asked of it.

use crate::audio::{
    AudioBackend, AudioError, AudioEvent, AudioEventSender, DefaultDeviceResolver, DeviceHandle,
    DeviceRole,
};
use std::sync::mpsc::Receiver;
use tracing::{debug, info, warn};

/// Tooltip label shown while no microphone is bound.
pub const NO_DEVICE_LABEL: &str = "(no device)";

/// One publication of the controller's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateUpdate {
    pub muted: bool,

    /// Device friendly name, or the "no device" sentinel
    pub label: String,

    /// Whether a device is bound
    pub bound: bool,

    /// False when `muted` equals the previously published value
    pub mute_changed: bool,
}

/// Receives every state publication.
pub trait Presenter {
    fn present(&mut self, update: &StateUpdate);
}

/// Commands accepted from hotkeys and the tray icon.
pub trait MuteCommands {
    fn mute(&mut self);
    fn unmute(&mut self);
    fn toggle(&mut self);
}

pub struct MuteStateController<B: AudioBackend, P: Presenter> {
    resolver: DefaultDeviceResolver<B>,
    device: Option<DeviceHandle<B::Endpoint>>,
    is_muted: bool,
    last_published: Option<bool>,
    events: AudioEventSender,
    presenter: P,
    no_device_label: String,
}

impl<B: AudioBackend, P: Presenter> MuteStateController<B, P> {
    /// Create an unbound controller. Starts muted; call
    /// [`refresh_device`](Self::refresh_device) to bind the current default.
    ///
    /// `events` is handed to every device subscription; the matching
    /// receiver must be drained into [`drain_events`](Self::drain_events).
    pub fn new(resolver: DefaultDeviceResolver<B>, events: AudioEventSender, presenter: P) -> Self {
        Self {
            resolver,
            device: None,
            is_muted: true,
            last_published: None,
            events,
            presenter,
            no_device_label: NO_DEVICE_LABEL.to_string(),
        }
    }

    pub fn with_no_device_label(mut self, label: impl Into<String>) -> Self {
        self.no_device_label = label.into();
        self
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    pub fn device(&self) -> Option<&DeviceHandle<B::Endpoint>> {
        self.device.as_ref()
    }

    pub fn device_label(&self) -> &str {
        self.device
            .as_ref()
            .map(|d| d.name())
            .unwrap_or(self.no_device_label.as_str())
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Re-resolve the default device and bind it.
    ///
    /// The previous device's subscription is released before the lookup.
    /// A newly bound device has its hardware flag forced to the current
    /// `is_muted`, so swapping devices never unmutes (and the first device
    /// at startup is always muted).
    pub fn refresh_device(&mut self) {
        if let Some(previous) = self.device.take() {
            debug!(device = previous.name(), "releasing device");
            previous.release();
        }

        match self.resolver.resolve() {
            Some(handle) => self.bind(handle),
            None => self.force_unbound(),
        }

        self.publish();
    }

    fn bind(&mut self, mut handle: DeviceHandle<B::Endpoint>) {
        // Attach first so the forced write below is observed like any other change.
        if let Err(e) = handle.subscribe(&self.events) {
            warn!(
                device = handle.name(),
                error = %e,
                "mute notifications unavailable until the next device change"
            );
        }

        // A write that fails without the device going away leaves the
        // hardware flag as it was; mirror it instead.
        let applied = handle.set_mute(self.is_muted).or_else(|e| {
            if e.is_device_gone() {
                return Err(e);
            }
            warn!(device = handle.name(), error = %e, "could not force mute state");
            handle.mute().map(|current| self.is_muted = current)
        });
        if let Err(e) = applied {
            warn!(device = handle.name(), error = %e, "device lost while binding");
            handle.release();
            self.force_unbound();
            return;
        }

        info!(
            device = handle.name(),
            generation = handle.generation(),
            muted = self.is_muted,
            "bound default capture device"
        );
        self.device = Some(handle);
    }

    fn force_unbound(&mut self) {
        info!("no capture device bound");
        self.device = None;
        self.is_muted = true;
    }

    fn publish(&mut self) {
        let update = StateUpdate {
            muted: self.is_muted,
            label: self.device_label().to_string(),
            bound: self.device.is_some(),
            mute_changed: self.last_published != Some(self.is_muted),
        };
        self.last_published = Some(self.is_muted);
        self.presenter.present(&update);
    }

    /// Apply a mute notification from the subscription tagged `generation`.
    ///
    /// Notifications from a released subscription are ignored.
    pub fn on_mute_notification(&mut self, generation: u64, muted: bool) {
        match &self.device {
            Some(handle) if handle.generation() == generation => {}
            _ => {
                debug!(generation, "dropping notification from stale subscription");
                return;
            }
        }

        self.is_muted = muted;
        self.publish();
    }

    /// The OS changed the default device for `role`.
    pub fn on_default_device_changed(&mut self, role: DeviceRole) {
        if role == self.resolver.role() {
            self.refresh_device();
        }
    }

    /// Apply one event from the audio queue.
    pub fn handle_event(&mut self, event: AudioEvent) {
        debug!(?event, "audio event");
        match event {
            AudioEvent::DefaultDeviceChanged { role, .. } => self.on_default_device_changed(role),
            AudioEvent::DeviceStateChanged {
                device_id,
                new_state,
            } => {
                let is_bound = self.device.as_ref().is_some_and(|d| d.id() == device_id);
                if is_bound && !new_state.is_active() {
                    info!(?new_state, "bound device is no longer active");
                    self.refresh_device();
                }
            }
            AudioEvent::MuteChanged { generation, muted } => {
                self.on_mute_notification(generation, muted)
            }
        }
    }

    /// Apply every queued audio event. Returns how many were applied.
    pub fn drain_events(&mut self, events: &Receiver<AudioEvent>) -> usize {
        let mut applied = 0;
        while let Ok(event) = events.try_recv() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    fn set_hardware_mute(&mut self, muted: bool) {
        let Some(handle) = &self.device else {
            debug!(muted, "no device bound; ignoring mute command");
            return;
        };
        if let Err(e) = handle.set_mute(muted) {
            self.on_endpoint_error(e);
        }
    }

    /// Device-gone faults drop the binding; anything else leaves it in place.
    fn on_endpoint_error(&mut self, error: AudioError) {
        if !error.is_device_gone() {
            warn!(error = %error, "mute command failed; device stays bound");
            return;
        }
        warn!(error = %error, "bound device became unreachable");
        if let Some(handle) = self.device.take() {
            handle.release();
        }
        self.force_unbound();
        self.publish();
    }

    /// Release the bound device. Used on exit.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.device.take() {
            info!(device = handle.name(), "releasing device for shutdown");
            handle.release();
        }
    }
}

impl<B: AudioBackend, P: Presenter> MuteCommands for MuteStateController<B, P> {
    fn mute(&mut self) {
        self.set_hardware_mute(true);
    }

    fn unmute(&mut self) {
        self.set_hardware_mute(false);
    }

    fn toggle(&mut self) {
        let Some(handle) = &self.device else {
            debug!("no device bound; ignoring toggle");
            return;
        };
        match handle.mute() {
            Ok(current) => self.set_hardware_mute(!current),
            Err(e) => self.on_endpoint_error(e),
        }
    }
}
