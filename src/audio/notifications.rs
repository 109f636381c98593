//! Device change notifications using IMMNotificationClient.
//!
//! Forwards default-device and device-state changes for capture endpoints
//! into the audio event queue.

use super::device::{AudioEvent, DeviceRole, DeviceState};
use super::events::AudioEventSender;
use tracing::debug;
use windows::core::{implement, PCWSTR};
use windows::Win32::Media::Audio::{
    eCapture, eCommunications, eConsole, EDataFlow, ERole, IMMDeviceEnumerator,
    IMMNotificationClient, IMMNotificationClient_Impl, DEVICE_STATE,
};
// Re-export windows_core so the implement macro can find it
#[allow(unused_imports)]
use windows_core;

/// Notification client that sends events to the audio event queue.
#[implement(IMMNotificationClient)]
pub struct DeviceNotificationClient {
    events: AudioEventSender,
}

impl DeviceNotificationClient {
    /// Create a new notification client.
    pub fn new(events: AudioEventSender) -> Self {
        Self { events }
    }

    /// Register this notification client with an enumerator.
    ///
    /// The returned registration unregisters the callback when dropped.
    pub fn register(
        self,
        enumerator: &IMMDeviceEnumerator,
    ) -> Result<EndpointNotificationRegistration, windows::core::Error> {
        unsafe {
            let client: IMMNotificationClient = self.into();
            enumerator.RegisterEndpointNotificationCallback(&client)?;
            Ok(EndpointNotificationRegistration {
                enumerator: enumerator.clone(),
                client,
            })
        }
    }

    fn convert_role(role: ERole) -> DeviceRole {
        if role == eConsole {
            DeviceRole::Console
        } else if role == eCommunications {
            DeviceRole::Communications
        } else {
            DeviceRole::Multimedia
        }
    }

    fn convert_state(state: DEVICE_STATE) -> DeviceState {
        match state.0 {
            1 => DeviceState::Active,
            2 => DeviceState::Disabled,
            4 => DeviceState::NotPresent,
            8 => DeviceState::Unplugged,
            _ => DeviceState::NotPresent,
        }
    }
}

impl IMMNotificationClient_Impl for DeviceNotificationClient_Impl {
    fn OnDeviceStateChanged(
        &self,
        pwstrdeviceid: &PCWSTR,
        dwnewstate: DEVICE_STATE,
    ) -> windows::core::Result<()> {
        unsafe {
            if let Ok(id) = pwstrdeviceid.to_string() {
                let _ = self.events.send(AudioEvent::DeviceStateChanged {
                    device_id: id,
                    new_state: DeviceNotificationClient::convert_state(dwnewstate),
                });
            }
        }
        Ok(())
    }

    fn OnDeviceAdded(&self, _pwstrdeviceid: &PCWSTR) -> windows::core::Result<()> {
        // A new device only matters once it becomes the default.
        Ok(())
    }

    fn OnDeviceRemoved(&self, _pwstrdeviceid: &PCWSTR) -> windows::core::Result<()> {
        Ok(())
    }

    fn OnDefaultDeviceChanged(
        &self,
        flow: EDataFlow,
        role: ERole,
        pwstrdefaultdeviceid: &PCWSTR,
    ) -> windows::core::Result<()> {
        // Only care about capture devices
        if flow != eCapture {
            return Ok(());
        }

        unsafe {
            let device_id = if pwstrdefaultdeviceid.is_null() {
                None
            } else {
                pwstrdefaultdeviceid.to_string().ok()
            };

            let _ = self.events.send(AudioEvent::DefaultDeviceChanged {
                role: DeviceNotificationClient::convert_role(role),
                device_id,
            });
        }
        Ok(())
    }

    fn OnPropertyValueChanged(
        &self,
        _pwstrdeviceid: &PCWSTR,
        _key: &windows::Win32::UI::Shell::PropertiesSystem::PROPERTYKEY,
    ) -> windows::core::Result<()> {
        Ok(())
    }
}

/// A registered [`DeviceNotificationClient`]. Unregisters on drop.
pub struct EndpointNotificationRegistration {
    enumerator: IMMDeviceEnumerator,
    client: IMMNotificationClient,
}

impl Drop for EndpointNotificationRegistration {
    fn drop(&mut self) {
        unsafe {
            if let Err(e) = self
                .enumerator
                .UnregisterEndpointNotificationCallback(&self.client)
            {
                debug!(error = %e, "endpoint notification callback already unregistered");
            }
        }
    }
}
