//! mute-it - Library
//!
//! A system tray utility that keeps the default communications microphone
//! muted or unmuted from a pair of global hotkeys.
//!
//! ## Features
//!
//! - Alt+Shift+P mutes, Alt+Shift+O unmutes (configurable)
//! - Tray icon and tooltip reflect the hardware mute flag
//! - Optional audible cue on every state change
//! - Follows default-device changes and hot-plug events, re-applying the
//!   last requested mute state to the new device

pub mod audio;
pub mod config;
pub mod controller;
pub mod feedback;
pub mod hotkey;

#[cfg(windows)]
pub mod app;
#[cfg(windows)]
pub mod platform;
#[cfg(windows)]
pub mod ui;

pub use audio::{AudioError, AudioEvent, DefaultDeviceResolver, DeviceHandle};
pub use config::{AppConfig, ConfigError};
pub use controller::{MuteCommands, MuteStateController, Presenter, StateUpdate};
pub use feedback::{Cue, FeedbackPresenter, IconKind};
pub use hotkey::{Chord, HotkeyDispatcher, HotkeyError};
