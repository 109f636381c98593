//! Platform-specific module for Windows utilities.
//!
//! This module contains the Windows implementations of the feedback
//! collaborators: tray icon images and audio cue playback.

pub mod icons;
pub mod sounds;

pub use sounds::SoundPlayer;
