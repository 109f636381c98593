//! In-memory audio service used by tests.
//!
//! Behaves like the Windows endpoint API where it matters to the mute logic:
//! writing a different mute value notifies every attached listener, writing
//! the same value is silent, and a removed device fails every call. Tests can
//! also inject a single fault into the next mute read or write.

use super::backend::{AudioBackend, CaptureEndpoint, Subscription};
use super::device::{AudioError, AudioEvent, DeviceRole};
use super::events::AudioEventSender;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

struct FakeDevice {
    name: String,
    muted: bool,
    present: bool,
}

struct Listener {
    key: u64,
    device_id: String,
    generation: u64,
    events: AudioEventSender,
}

#[derive(Default)]
struct FakeAudio {
    default_device: Option<String>,
    devices: HashMap<String, FakeDevice>,
    listeners: Vec<Listener>,
    next_key: u64,
    max_live: usize,
    fail_lookup: bool,
    fail_subscribe: bool,
    next_fault: Option<AudioError>,
    lookups: Vec<DeviceRole>,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Rc<RefCell<FakeAudio>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_device(&self, id: &str, name: &str, muted: bool) {
        self.inner.borrow_mut().devices.insert(
            id.to_string(),
            FakeDevice {
                name: name.to_string(),
                muted,
                present: true,
            },
        );
    }

    pub fn set_default(&self, id: Option<&str>) {
        self.inner.borrow_mut().default_device = id.map(str::to_string);
    }

    /// Unplug a device. Existing endpoints start failing with `DeviceLost`.
    pub fn remove_device(&self, id: &str) {
        let mut inner = self.inner.borrow_mut();
        if let Some(device) = inner.devices.get_mut(id) {
            device.present = false;
        }
        if inner.default_device.as_deref() == Some(id) {
            inner.default_device = None;
        }
    }

    /// The device stops answering but the OS has not yet picked a new
    /// default, so lookups still return it.
    pub fn vanish_device(&self, id: &str) {
        if let Some(device) = self.inner.borrow_mut().devices.get_mut(id) {
            device.present = false;
        }
    }

    /// The next endpoint mute read or write fails with `error`.
    pub fn fail_next_call(&self, error: AudioError) {
        self.inner.borrow_mut().next_fault = Some(error);
    }

    /// Another application changes the hardware mute flag.
    pub fn external_set_mute(&self, id: &str, muted: bool) {
        set_device_mute(&self.inner, id, muted).expect("device must be present");
    }

    pub fn hardware_mute(&self, id: &str) -> bool {
        self.inner.borrow().devices[id].muted
    }

    pub fn live_subscriptions(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn max_live_subscriptions(&self) -> usize {
        self.inner.borrow().max_live
    }

    pub fn fail_lookups(&self, fail: bool) {
        self.inner.borrow_mut().fail_lookup = fail;
    }

    pub fn fail_subscriptions(&self, fail: bool) {
        self.inner.borrow_mut().fail_subscribe = fail;
    }

    pub fn lookups(&self) -> Vec<DeviceRole> {
        self.inner.borrow().lookups.clone()
    }
}

impl AudioBackend for FakeBackend {
    type Endpoint = FakeEndpoint;

    fn default_capture_endpoint(
        &self,
        role: DeviceRole,
    ) -> Result<Option<FakeEndpoint>, AudioError> {
        let mut inner = self.inner.borrow_mut();
        inner.lookups.push(role);
        if inner.fail_lookup {
            return Err(AudioError::DeviceUnavailable);
        }
        let Some(id) = inner.default_device.clone() else {
            return Ok(None);
        };
        let name = inner.devices[&id].name.clone();
        Ok(Some(FakeEndpoint {
            id,
            name,
            audio: Rc::clone(&self.inner),
        }))
    }
}

pub struct FakeEndpoint {
    id: String,
    name: String,
    audio: Rc<RefCell<FakeAudio>>,
}

impl CaptureEndpoint for FakeEndpoint {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn mute(&self) -> Result<bool, AudioError> {
        let mut inner = self.audio.borrow_mut();
        if let Some(fault) = inner.next_fault.take() {
            return Err(fault);
        }
        match inner.devices.get(&self.id) {
            Some(device) if device.present => Ok(device.muted),
            _ => Err(AudioError::DeviceLost {
                device_id: self.id.clone(),
            }),
        }
    }

    fn set_mute(&self, muted: bool) -> Result<(), AudioError> {
        set_device_mute(&self.audio, &self.id, muted)
    }

    fn subscribe(
        &self,
        generation: u64,
        events: AudioEventSender,
    ) -> Result<Subscription, AudioError> {
        let mut inner = self.audio.borrow_mut();
        if inner.fail_subscribe {
            return Err(AudioError::SubscriptionFailed {
                device_id: self.id.clone(),
            });
        }
        let key = inner.next_key;
        inner.next_key += 1;
        inner.listeners.push(Listener {
            key,
            device_id: self.id.clone(),
            generation,
            events,
        });
        inner.max_live = inner.max_live.max(inner.listeners.len());

        let audio = Rc::clone(&self.audio);
        Ok(Subscription::new(move || {
            audio.borrow_mut().listeners.retain(|l| l.key != key);
        }))
    }
}

fn set_device_mute(audio: &RefCell<FakeAudio>, id: &str, muted: bool) -> Result<(), AudioError> {
    let targets: Vec<(u64, AudioEventSender)> = {
        let mut inner = audio.borrow_mut();
        if let Some(fault) = inner.next_fault.take() {
            return Err(fault);
        }
        let device = match inner.devices.get_mut(id) {
            Some(device) if device.present => device,
            _ => {
                return Err(AudioError::DeviceLost {
                    device_id: id.to_string(),
                })
            }
        };
        if device.muted == muted {
            return Ok(());
        }
        device.muted = muted;
        inner
            .listeners
            .iter()
            .filter(|l| l.device_id == id)
            .map(|l| (l.generation, l.events.clone()))
            .collect()
    };

    for (generation, events) in targets {
        events.send(AudioEvent::MuteChanged { generation, muted });
    }
    Ok(())
}
