//! Audio device data models.
//!
//! Defines the roles and states reported by the Windows audio service, the
//! events that flow from the audio service into the controller, and the
//! audio error taxonomy.

use thiserror::Error;

/// Audio device role (maps to Windows ERole enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DeviceRole {
    /// Used by games, system sounds, most general applications
    Console = 0,

    /// Used by music players, video players
    Multimedia = 1,

    /// Used by Teams, Zoom, Discord, and other VoIP applications
    Communications = 2,
}

/// Windows device state flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// Device is active and available for use
    Active,

    /// Device is disabled in Windows Sound settings
    Disabled,

    /// Device is not present (driver issue)
    NotPresent,

    /// Device is unplugged (for pluggable devices)
    Unplugged,
}

impl DeviceState {
    pub fn is_active(self) -> bool {
        self == DeviceState::Active
    }
}

/// Events from the Windows audio system.
///
/// These are produced on whatever thread the audio service uses for its
/// callbacks and consumed on the thread that owns the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    /// Default capture device changed for a specific role
    DefaultDeviceChanged {
        role: DeviceRole,
        device_id: Option<String>, // None if no default device
    },

    /// Device state changed (active, disabled, not present, unplugged)
    DeviceStateChanged {
        device_id: String,
        new_state: DeviceState,
    },

    /// Hardware mute flag reported by a device subscription.
    ///
    /// `generation` identifies the subscription that produced the event so
    /// that notifications from a released subscription can be dropped.
    MuteChanged { generation: u64, muted: bool },
}

/// Audio service error types.
#[derive(Debug, Error)]
pub enum AudioError {
    /// No default communication capture device could be resolved.
    #[error("No default capture device available")]
    DeviceUnavailable,

    /// A bound device became unreachable during an operation.
    #[error("Device lost: {device_id}")]
    DeviceLost { device_id: String },

    /// Mute-change notifications could not be attached to a device.
    #[error("Failed to subscribe to mute notifications for {device_id}")]
    SubscriptionFailed { device_id: String },

    #[cfg(windows)]
    #[error("COM initialization failed: {0}")]
    ComInitFailed(#[source] windows::core::Error),

    #[cfg(windows)]
    #[error("Failed to enumerate devices: {0}")]
    EnumerationFailed(#[source] windows::core::Error),

    #[cfg(windows)]
    #[error("Volume control not available for device: {0}")]
    VolumeNotAvailable(#[source] windows::core::Error),

    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsError(#[source] windows::core::Error),

    #[error("String conversion error: {0}")]
    StringConversion(String),
}

impl AudioError {
    /// True for faults that mean the device is gone and the controller should
    /// fall back to the unbound state.
    pub fn is_device_gone(&self) -> bool {
        match self {
            AudioError::DeviceUnavailable | AudioError::DeviceLost { .. } => true,
            #[cfg(windows)]
            AudioError::WindowsError(_) | AudioError::VolumeNotAvailable(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_faults_are_classified_as_gone() {
        assert!(AudioError::DeviceUnavailable.is_device_gone());
        assert!(AudioError::DeviceLost {
            device_id: "mic".into()
        }
        .is_device_gone());
        assert!(!AudioError::SubscriptionFailed {
            device_id: "mic".into()
        }
        .is_device_gone());
        assert!(!AudioError::StringConversion("bad".into()).is_device_gone());
    }

    #[test]
    fn only_active_state_is_active() {
        assert!(DeviceState::Active.is_active());
        assert!(!DeviceState::Disabled.is_active());
        assert!(!DeviceState::Unplugged.is_active());
        assert!(!DeviceState::NotPresent.is_active());
    }
}
