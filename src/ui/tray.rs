//! System tray icon management.
//!
//! Manages the indicator icon, its tooltip and its Exit menu.

use crate::feedback::{IconKind, Indicator};
use crate::platform::icons;
use thiserror::Error;
use tracing::warn;
use tray_icon::{
    menu::{Menu, MenuEvent, MenuId, MenuItem},
    Icon, MouseButton, TrayIcon, TrayIconBuilder, TrayIconEvent,
};

/// Initial state for tray icon.
#[derive(Debug, Clone)]
pub struct TrayState {
    /// Tooltip text (device name + mute state)
    pub tooltip: String,

    /// Whether the microphone is muted
    pub muted: bool,
}

/// Events from the system tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayEvent {
    /// Double-click on tray icon
    DoubleClick,

    /// "Exit" menu item selected
    Exit,
}

/// Tray service error types.
#[derive(Debug, Error)]
pub enum TrayError {
    #[error("Failed to create tray icon: {0}")]
    CreateFailed(String),

    #[error("Failed to load icon resource: {0}")]
    IconLoadFailed(String),

    #[error("Tray icon not initialized")]
    NotInitialized,

    #[error("Failed to create menu: {0}")]
    MenuFailed(String),
}

/// System tray manager.
pub struct TrayManager {
    tray_icon: Option<TrayIcon>,
    live_icon: Icon,
    muted_icon: Icon,
    exit_menu_id: Option<MenuId>,
}

impl TrayManager {
    /// Create a new TrayManager. Icons are built up front and reused.
    pub fn new() -> Result<Self, TrayError> {
        let live_icon = icons::create_icon(IconKind::MicOn).map_err(TrayError::IconLoadFailed)?;
        let muted_icon = icons::create_icon(IconKind::MicOff).map_err(TrayError::IconLoadFailed)?;
        Ok(Self {
            tray_icon: None,
            live_icon,
            muted_icon,
            exit_menu_id: None,
        })
    }

    fn icon(&self, kind: IconKind) -> Icon {
        match kind {
            IconKind::MicOn => self.live_icon.clone(),
            IconKind::MicOff => self.muted_icon.clone(),
        }
    }

    /// Create and show the tray icon.
    pub fn create(&mut self, initial_state: TrayState) -> Result<(), TrayError> {
        let menu = Menu::new();

        let exit_item = MenuItem::new("Exit", true, None);
        self.exit_menu_id = Some(exit_item.id().clone());
        menu.append(&exit_item)
            .map_err(|e| TrayError::MenuFailed(e.to_string()))?;

        let tray_icon = TrayIconBuilder::new()
            .with_icon(self.icon(IconKind::for_state(initial_state.muted)))
            .with_tooltip(&initial_state.tooltip)
            .with_menu(Box::new(menu))
            .build()
            .map_err(|e| TrayError::CreateFailed(e.to_string()))?;

        self.tray_icon = Some(tray_icon);

        Ok(())
    }

    /// Drain pending tray and menu events. Call this from the event loop.
    pub fn poll_events(&self) -> Vec<TrayEvent> {
        let mut events = Vec::new();

        while let Ok(event) = TrayIconEvent::receiver().try_recv() {
            if let TrayIconEvent::DoubleClick {
                button: MouseButton::Left,
                ..
            } = event
            {
                events.push(TrayEvent::DoubleClick);
            }
        }

        while let Ok(event) = MenuEvent::receiver().try_recv() {
            if Some(&event.id) == self.exit_menu_id.as_ref() {
                events.push(TrayEvent::Exit);
            }
        }

        events
    }

    /// Update the tray icon.
    pub fn set_icon(&mut self, kind: IconKind) -> Result<(), TrayError> {
        let icon = self.icon(kind);
        let tray = self.tray_icon.as_mut().ok_or(TrayError::NotInitialized)?;
        tray.set_icon(Some(icon))
            .map_err(|e| TrayError::CreateFailed(e.to_string()))?;
        Ok(())
    }

    /// Update the tooltip text.
    pub fn set_tooltip(&mut self, text: &str) -> Result<(), TrayError> {
        let tray = self.tray_icon.as_mut().ok_or(TrayError::NotInitialized)?;
        tray.set_tooltip(Some(text))
            .map_err(|e| TrayError::CreateFailed(e.to_string()))?;
        Ok(())
    }

    /// Destroy the tray icon.
    pub fn destroy(&mut self) {
        self.tray_icon = None;
    }
}

impl Indicator for TrayManager {
    fn show(&mut self, icon: IconKind, tooltip: &str) {
        if let Err(e) = self.set_icon(icon).and_then(|()| self.set_tooltip(tooltip)) {
            warn!(error = %e, "failed to update tray icon");
        }
    }
}
