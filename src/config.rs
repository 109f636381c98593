//! Configuration loading.
//!
//! Defaults match the classic behaviour (Alt+Shift+P mutes, Alt+Shift+O
//! unmutes, Windows speech cues). Environment variables can override them
//! for the current session; nothing is persisted.

use crate::controller::NO_DEVICE_LABEL;
use crate::hotkey::{Chord, HotkeyError};
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_MUTE_HOTKEY: &str = "MUTE_IT_MUTE_HOTKEY";
pub const ENV_UNMUTE_HOTKEY: &str = "MUTE_IT_UNMUTE_HOTKEY";
pub const ENV_CUES: &str = "MUTE_IT_CUES";
pub const ENV_CUE_DIR: &str = "MUTE_IT_CUE_DIR";

const DEFAULT_MUTE_HOTKEY: Chord = Chord::alt_shift('P');
const DEFAULT_UNMUTE_HOTKEY: Chord = Chord::alt_shift('O');

const SPEECH_ON_FILE: &str = "Speech On.wav";
const SPEECH_OFF_FILE: &str = "Speech Off.wav";

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}: {source}")]
    InvalidHotkey {
        var: &'static str,
        #[source]
        source: HotkeyError,
    },

    #[error("{var}: expected on/off, got \"{value}\"")]
    InvalidFlag { var: &'static str, value: String },

    #[error("mute and unmute hotkeys are both {0}")]
    DuplicateHotkey(Chord),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mute_hotkey: Chord,
    pub unmute_hotkey: Chord,

    /// Play a cue on every mute state change
    pub cues_enabled: bool,

    /// Directory holding "Speech On.wav" and "Speech Off.wav"
    pub cue_dir: PathBuf,

    /// Tooltip shown while no microphone is available
    pub no_device_label: String,
}

/// `%WINDIR%\Media`
fn default_cue_dir(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    let windir = lookup("WINDIR")
        .or_else(|| lookup("SystemRoot"))
        .unwrap_or_else(|| r"C:\Windows".to_string());
    PathBuf::from(windir).join("Media")
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: value.to_string(),
        }),
    }
}

impl AppConfig {
    /// Load configuration from environment and defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let hotkey = |var: &'static str, default: Chord| -> Result<Chord, ConfigError> {
            match lookup(var) {
                Some(value) => value
                    .parse()
                    .map_err(|source| ConfigError::InvalidHotkey { var, source }),
                None => Ok(default),
            }
        };

        let mute_hotkey = hotkey(ENV_MUTE_HOTKEY, DEFAULT_MUTE_HOTKEY)?;
        let unmute_hotkey = hotkey(ENV_UNMUTE_HOTKEY, DEFAULT_UNMUTE_HOTKEY)?;
        if mute_hotkey == unmute_hotkey {
            return Err(ConfigError::DuplicateHotkey(mute_hotkey));
        }

        let cues_enabled = match lookup(ENV_CUES) {
            Some(value) => parse_flag(ENV_CUES, &value)?,
            None => true,
        };

        let cue_dir = lookup(ENV_CUE_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| default_cue_dir(&lookup));

        Ok(Self {
            mute_hotkey,
            unmute_hotkey,
            cues_enabled,
            cue_dir,
            no_device_label: NO_DEVICE_LABEL.to_string(),
        })
    }

    pub fn speech_on_cue(&self) -> PathBuf {
        self.cue_dir.join(SPEECH_ON_FILE)
    }

    pub fn speech_off_cue(&self) -> PathBuf {
        self.cue_dir.join(SPEECH_OFF_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_without_overrides() {
        let config = load(&[("WINDIR", r"D:\Win")]).unwrap();
        assert_eq!(config.mute_hotkey.to_string(), "Alt+Shift+P");
        assert_eq!(config.unmute_hotkey.to_string(), "Alt+Shift+O");
        assert!(config.cues_enabled);
        assert_eq!(config.no_device_label, NO_DEVICE_LABEL);
        assert_eq!(config.cue_dir, PathBuf::from(r"D:\Win").join("Media"));
        assert!(config.speech_on_cue().ends_with(SPEECH_ON_FILE));
        assert!(config.speech_off_cue().ends_with(SPEECH_OFF_FILE));
    }

    #[test]
    fn environment_overrides() {
        let config = load(&[
            (ENV_MUTE_HOTKEY, "Ctrl+Alt+M"),
            (ENV_UNMUTE_HOTKEY, "Ctrl+Alt+U"),
            (ENV_CUES, "off"),
            (ENV_CUE_DIR, "sounds"),
        ])
        .unwrap();
        assert_eq!(config.mute_hotkey.to_string(), "Ctrl+Alt+M");
        assert_eq!(config.unmute_hotkey.to_string(), "Ctrl+Alt+U");
        assert!(!config.cues_enabled);
        assert_eq!(config.cue_dir, PathBuf::from("sounds"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            load(&[(ENV_MUTE_HOTKEY, "P")]),
            Err(ConfigError::InvalidHotkey { var: ENV_MUTE_HOTKEY, .. })
        ));
        assert!(matches!(
            load(&[(ENV_CUES, "maybe")]),
            Err(ConfigError::InvalidFlag { .. })
        ));
        assert!(matches!(
            load(&[(ENV_UNMUTE_HOTKEY, "alt+shift+p")]),
            Err(ConfigError::DuplicateHotkey(_))
        ));
    }
}
