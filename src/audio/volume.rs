//! Mute control and mute notifications using IAudioEndpointVolume.

use super::backend::{CaptureEndpoint, Subscription};
use super::device::{AudioError, AudioEvent};
use super::events::AudioEventSender;
use tracing::debug;
use windows::core::implement;
use windows::Win32::Media::Audio::Endpoints::{
    IAudioEndpointVolume, IAudioEndpointVolumeCallback, IAudioEndpointVolumeCallback_Impl,
};
use windows::Win32::Media::Audio::{IMMDevice, AUDIO_VOLUME_NOTIFICATION_DATA};
use windows::Win32::System::Com::CLSCTX_ALL;
// Re-export windows_core so the implement macro can find it
#[allow(unused_imports)]
use windows_core;

/// Mute controller for a specific device.
pub struct VolumeController {
    endpoint_volume: IAudioEndpointVolume,
}

impl VolumeController {
    /// Create a new VolumeController for the given device.
    pub fn new(device: &IMMDevice) -> Result<Self, AudioError> {
        unsafe {
            let endpoint_volume: IAudioEndpointVolume = device
                .Activate(CLSCTX_ALL, None)
                .map_err(AudioError::VolumeNotAvailable)?;

            Ok(Self { endpoint_volume })
        }
    }

    /// Get the current mute state.
    pub fn get_mute(&self) -> Result<bool, AudioError> {
        unsafe {
            let muted = self
                .endpoint_volume
                .GetMute()
                .map_err(AudioError::WindowsError)?;
            Ok(muted.as_bool())
        }
    }

    /// Set the mute state.
    pub fn set_mute(&self, muted: bool) -> Result<(), AudioError> {
        unsafe {
            self.endpoint_volume
                .SetMute(muted, std::ptr::null())
                .map_err(AudioError::WindowsError)?;
            Ok(())
        }
    }

    /// Attach a mute-change callback that forwards to `events`.
    pub fn register_mute_callback(
        &self,
        generation: u64,
        events: AudioEventSender,
    ) -> Result<Subscription, windows::core::Error> {
        let callback: IAudioEndpointVolumeCallback =
            MuteNotificationClient { generation, events }.into();

        unsafe {
            self.endpoint_volume.RegisterControlChangeNotify(&callback)?;
        }

        let endpoint_volume = self.endpoint_volume.clone();
        Ok(Subscription::new(move || unsafe {
            // Fails when the device has already gone away; nothing left to detach.
            if let Err(e) = endpoint_volume.UnregisterControlChangeNotify(&callback) {
                debug!(generation, error = %e, "mute callback already detached");
            }
        }))
    }
}

/// A capture endpoint bound through Core Audio.
pub struct WindowsEndpoint {
    id: String,
    name: String,
    volume: VolumeController,
    // Keeps the device object alive for the lifetime of the volume interface.
    _device: IMMDevice,
}

impl WindowsEndpoint {
    pub fn new(device: IMMDevice, id: String, name: String) -> Result<Self, AudioError> {
        let volume = VolumeController::new(&device)?;
        Ok(Self {
            id,
            name,
            volume,
            _device: device,
        })
    }

    fn lost(&self, e: AudioError) -> AudioError {
        debug!(device_id = %self.id, error = %e, "endpoint call failed");
        AudioError::DeviceLost {
            device_id: self.id.clone(),
        }
    }
}

impl CaptureEndpoint for WindowsEndpoint {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn mute(&self) -> Result<bool, AudioError> {
        self.volume.get_mute().map_err(|e| self.lost(e))
    }

    fn set_mute(&self, muted: bool) -> Result<(), AudioError> {
        self.volume.set_mute(muted).map_err(|e| self.lost(e))
    }

    fn subscribe(
        &self,
        generation: u64,
        events: AudioEventSender,
    ) -> Result<Subscription, AudioError> {
        self.volume
            .register_mute_callback(generation, events)
            .map_err(|e| {
                debug!(device_id = %self.id, error = %e, "RegisterControlChangeNotify failed");
                AudioError::SubscriptionFailed {
                    device_id: self.id.clone(),
                }
            })
    }
}

/// Receives endpoint volume notifications on a COM worker thread and queues
/// the mute flag for the UI thread.
#[implement(IAudioEndpointVolumeCallback)]
struct MuteNotificationClient {
    generation: u64,
    events: AudioEventSender,
}

impl IAudioEndpointVolumeCallback_Impl for MuteNotificationClient_Impl {
    fn OnNotify(&self, pnotify: *mut AUDIO_VOLUME_NOTIFICATION_DATA) -> windows::core::Result<()> {
        // Safety: the audio service passes a valid pointer for the duration of the call.
        if let Some(data) = unsafe { pnotify.as_ref() } {
            let _ = self.events.send(AudioEvent::MuteChanged {
                generation: self.generation,
                muted: data.bMuted.as_bool(),
            });
        }
        Ok(())
    }
}
