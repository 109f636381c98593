//! UI module for the system tray indicator.

pub mod tray;

pub use tray::{TrayError, TrayEvent, TrayManager, TrayState};
