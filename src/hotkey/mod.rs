//! Global hotkeys.
//!
//! Two chords are bound for the process lifetime, one for mute and one for
//! unmute. Registration conflicts disable only the affected chord.

pub mod chord;
pub mod dispatcher;
#[cfg(windows)]
pub mod win32;

pub use chord::{Chord, Modifiers};
pub use dispatcher::{BindingId, HotkeyBinding, HotkeyCommand, HotkeyDispatcher, HotkeyRegistrar};
#[cfg(windows)]
pub use win32::Win32Registrar;

use thiserror::Error;

/// Hotkey error types.
#[derive(Debug, Error)]
pub enum HotkeyError {
    #[error("hotkey {chord} is already registered by another application")]
    Conflict { chord: Chord },

    #[error("invalid hotkey \"{input}\": {reason}")]
    InvalidChord { input: String, reason: String },

    #[cfg(windows)]
    #[error("failed to register hotkey {chord}: {source}")]
    Registration {
        chord: Chord,
        #[source]
        source: windows::core::Error,
    },
}
