//! Audio cue playback through PlaySound.

use crate::feedback::{Cue, CuePlayer};
use std::os::windows::ffi::OsStrExt;
use std::path::Path;
use tracing::{debug, warn};
use windows::core::PCWSTR;
use windows::Win32::Media::Audio::{PlaySoundW, SND_ASYNC, SND_FILENAME, SND_NODEFAULT};

/// Plays the speech on/off wave files asynchronously.
pub struct SoundPlayer {
    speech_on: Vec<u16>,
    speech_off: Vec<u16>,
}

impl SoundPlayer {
    pub fn new(speech_on: &Path, speech_off: &Path) -> Self {
        for path in [speech_on, speech_off] {
            if !path.is_file() {
                warn!(path = %path.display(), "cue file not found");
            }
        }
        Self {
            speech_on: Self::to_wide(speech_on),
            speech_off: Self::to_wide(speech_off),
        }
    }

    fn to_wide(path: &Path) -> Vec<u16> {
        path.as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect()
    }
}

impl CuePlayer for SoundPlayer {
    fn play(&mut self, cue: Cue) {
        let path = match cue {
            Cue::SpeechOn => &self.speech_on,
            Cue::SpeechOff => &self.speech_off,
        };
        // SND_ASYNC starts playback and returns; a newer cue cuts off the previous one.
        let started = unsafe {
            PlaySoundW(
                PCWSTR::from_raw(path.as_ptr()),
                None,
                SND_FILENAME | SND_ASYNC | SND_NODEFAULT,
            )
        };
        if !started.as_bool() {
            debug!(?cue, "PlaySound failed");
        }
    }
}

impl Drop for SoundPlayer {
    fn drop(&mut self) {
        // Stop any cue still playing from our buffers.
        unsafe {
            let _ = PlaySoundW(PCWSTR::null(), None, SND_ASYNC);
        }
    }
}
