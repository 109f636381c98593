//! Device lookup using the Windows MMDevice API.
//!
//! Provides COM initialization and default-endpoint resolution.

use super::backend::AudioBackend;
use super::device::{AudioError, DeviceRole};
use super::volume::WindowsEndpoint;
use windows::Win32::Devices::Properties::DEVPKEY_Device_FriendlyName;
use windows::Win32::Foundation::E_NOTFOUND;
use windows::Win32::Media::Audio::{
    eCapture, eCommunications, eConsole, eMultimedia, ERole, IMMDevice, IMMDeviceEnumerator,
    MMDeviceEnumerator,
};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoTaskMemFree, CoUninitialize, CLSCTX_ALL,
    COINIT_APARTMENTTHREADED, STGM,
};
use windows::Win32::UI::Shell::PropertiesSystem::{IPropertyStore, PROPERTYKEY};

/// COM initialization guard that uninitializes COM on drop.
pub struct ComGuard {
    initialized: bool,
}

impl ComGuard {
    /// Initialize COM for the current thread.
    pub fn new() -> Result<Self, AudioError> {
        unsafe {
            // Use apartment-threaded for UI compatibility
            CoInitializeEx(None, COINIT_APARTMENTTHREADED)
                .ok()
                .map_err(AudioError::ComInitFailed)?;
        }
        Ok(Self { initialized: true })
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        if self.initialized {
            unsafe {
                CoUninitialize();
            }
        }
    }
}

pub(crate) fn to_erole(role: DeviceRole) -> ERole {
    match role {
        DeviceRole::Console => eConsole,
        DeviceRole::Multimedia => eMultimedia,
        DeviceRole::Communications => eCommunications,
    }
}

/// Device enumerator using Windows MMDevice API.
pub struct DeviceEnumerator {
    enumerator: IMMDeviceEnumerator,
}

impl DeviceEnumerator {
    /// Create a new DeviceEnumerator.
    ///
    /// Note: COM must be initialized before calling this function.
    pub fn new() -> Result<Self, AudioError> {
        unsafe {
            let enumerator: IMMDeviceEnumerator =
                CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL)
                    .map_err(AudioError::EnumerationFailed)?;

            Ok(Self { enumerator })
        }
    }

    /// Get the raw IMMDeviceEnumerator for notification registration.
    pub fn raw_enumerator(&self) -> &IMMDeviceEnumerator {
        &self.enumerator
    }

    fn device_id(device: &IMMDevice) -> Result<String, AudioError> {
        unsafe {
            let id = device.GetId().map_err(AudioError::WindowsError)?;
            let converted = id
                .to_string()
                .map_err(|e| AudioError::StringConversion(e.to_string()));
            CoTaskMemFree(Some(id.0 as *const _));
            converted
        }
    }

    /// Get the friendly name of a device from its property store.
    fn device_name(device: &IMMDevice) -> Option<String> {
        unsafe {
            let props: IPropertyStore = device.OpenPropertyStore(STGM(0)).ok()?; // STGM_READ = 0

            // Convert DEVPROPKEY to PROPERTYKEY
            let key = PROPERTYKEY {
                fmtid: DEVPKEY_Device_FriendlyName.fmtid,
                pid: DEVPKEY_Device_FriendlyName.pid,
            };

            let prop = props.GetValue(&key).ok()?;
            let name = prop.to_string();
            if name.is_empty() {
                None
            } else {
                Some(name)
            }
        }
    }
}

impl AudioBackend for DeviceEnumerator {
    type Endpoint = WindowsEndpoint;

    fn default_capture_endpoint(
        &self,
        role: DeviceRole,
    ) -> Result<Option<WindowsEndpoint>, AudioError> {
        let device = unsafe {
            match self
                .enumerator
                .GetDefaultAudioEndpoint(eCapture, to_erole(role))
            {
                Ok(device) => device,
                Err(e) if e.code() == E_NOTFOUND => return Ok(None),
                Err(e) => return Err(AudioError::EnumerationFailed(e)),
            }
        };

        let id = Self::device_id(&device)?;
        let name = Self::device_name(&device).unwrap_or_else(|| "Unknown".to_string());
        WindowsEndpoint::new(device, id, name).map(Some)
    }
}
