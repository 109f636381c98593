//! Global hotkeys through RegisterHotKey.
//!
//! Chords are registered against the calling thread (no window), so
//! activations arrive as `WM_HOTKEY` thread messages carrying the
//! [`BindingId`] in `wParam`.

use super::dispatcher::{BindingId, HotkeyRegistrar};
use super::{Chord, HotkeyError};
use windows::core::HRESULT;
use windows::Win32::Foundation::ERROR_HOTKEY_ALREADY_REGISTERED;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    RegisterHotKey, UnregisterHotKey, HOT_KEY_MODIFIERS, MOD_ALT, MOD_CONTROL, MOD_NOREPEAT,
    MOD_SHIFT, MOD_WIN,
};

// Application hotkey ids must be in 0x0000..=0xBFFF.
const FIRST_ID: i32 = 0x0100;

pub struct Win32Registrar {
    next_id: i32,
}

impl Win32Registrar {
    pub fn new() -> Self {
        Self { next_id: FIRST_ID }
    }

    fn modifier_flags(chord: &Chord) -> HOT_KEY_MODIFIERS {
        let m = &chord.modifiers;
        let mut flags = MOD_NOREPEAT;
        for (held, flag) in [
            (m.control, MOD_CONTROL),
            (m.alt, MOD_ALT),
            (m.shift, MOD_SHIFT),
            (m.win, MOD_WIN),
        ] {
            if held {
                flags = flags | flag;
            }
        }
        flags
    }
}

impl Default for Win32Registrar {
    fn default() -> Self {
        Self::new()
    }
}

impl HotkeyRegistrar for Win32Registrar {
    fn register(&mut self, chord: &Chord) -> Result<BindingId, HotkeyError> {
        let id = self.next_id;
        unsafe {
            RegisterHotKey(None, id, Self::modifier_flags(chord), chord.key).map_err(|e| {
                if e.code() == HRESULT::from_win32(ERROR_HOTKEY_ALREADY_REGISTERED.0) {
                    HotkeyError::Conflict { chord: *chord }
                } else {
                    HotkeyError::Registration {
                        chord: *chord,
                        source: e,
                    }
                }
            })?;
        }
        self.next_id += 1;
        Ok(BindingId(id))
    }

    fn unregister(&mut self, id: BindingId) {
        unsafe {
            let _ = UnregisterHotKey(None, id.0);
        }
    }
}
