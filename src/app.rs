//! Application lifecycle management.
//!
//! Wires the audio service, hotkeys and tray indicator to the mute state
//! controller and runs the Win32 message loop on the main thread.

use crate::audio::notifications::{DeviceNotificationClient, EndpointNotificationRegistration};
use crate::audio::{event_channel, AudioEvent, ComGuard, DefaultDeviceResolver, DeviceEnumerator};
use crate::config::AppConfig;
use crate::controller::MuteStateController;
use crate::feedback::FeedbackPresenter;
use crate::hotkey::{BindingId, HotkeyDispatcher, Win32Registrar};
use crate::platform::SoundPlayer;
use crate::ui::{TrayEvent, TrayManager, TrayState};
use anyhow::{Context, Result};
use std::sync::mpsc::Receiver;
use tracing::{debug, info, warn};
use windows::core::PCWSTR;
use windows::Win32::Foundation::{LPARAM, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, MessageBoxW, PostThreadMessageW, TranslateMessage,
    MB_ICONERROR, MB_OK, MSG, WM_APP, WM_HOTKEY,
};

/// Thread message posted whenever an audio event is queued.
pub const WM_AUDIO_EVENT: u32 = WM_APP + 1;

type Presenter = FeedbackPresenter<TrayManager, SoundPlayer>;
type Controller = MuteStateController<DeviceEnumerator, Presenter>;

/// Show a modal error box. Used when startup fails before the tray exists.
pub fn show_error(msg: &str) {
    let msg_wide: Vec<u16> = msg.encode_utf16().chain(std::iter::once(0)).collect();
    let title_wide: Vec<u16> = "mute-it".encode_utf16().chain(std::iter::once(0)).collect();
    unsafe {
        MessageBoxW(
            None,
            PCWSTR(msg_wide.as_ptr()),
            PCWSTR(title_wide.as_ptr()),
            MB_OK | MB_ICONERROR,
        );
    }
}

/// Everything that lives for the duration of the message loop.
struct App {
    controller: Controller,
    hotkeys: HotkeyDispatcher<Win32Registrar>,
    notifications: Option<EndpointNotificationRegistration>,
    events: Receiver<AudioEvent>,
}

impl App {
    fn start(config: &AppConfig) -> Result<Self> {
        let thread_id = unsafe { GetCurrentThreadId() };
        let (sender, events) = event_channel(move || unsafe {
            // Failure means the loop has exited; the queued event is moot.
            let _ = PostThreadMessageW(thread_id, WM_AUDIO_EVENT, WPARAM(0), LPARAM(0));
        });

        let enumerator = DeviceEnumerator::new().context("failed to create device enumerator")?;
        let notifications = DeviceNotificationClient::new(sender.clone())
            .register(enumerator.raw_enumerator())
            .context("failed to register for device notifications")?;

        let mut tray = TrayManager::new()?;
        tray.create(TrayState {
            tooltip: config.no_device_label.clone(),
            muted: true,
        })?;

        let cues = config
            .cues_enabled
            .then(|| SoundPlayer::new(&config.speech_on_cue(), &config.speech_off_cue()));

        let mut controller = MuteStateController::new(
            DefaultDeviceResolver::new(enumerator),
            sender,
            FeedbackPresenter::new(tray, cues),
        )
        .with_no_device_label(config.no_device_label.clone());

        let mut hotkeys = HotkeyDispatcher::new(
            Win32Registrar::new(),
            config.mute_hotkey,
            config.unmute_hotkey,
        );
        let failed = hotkeys.register_all();
        if failed.len() == hotkeys.bindings().len() {
            warn!("no hotkeys registered; only the tray icon can change the mute state");
        }

        controller.refresh_device();
        info!(
            device = controller.device_label(),
            muted = controller.is_muted(),
            "started"
        );

        Ok(Self {
            controller,
            hotkeys,
            notifications: Some(notifications),
            events,
        })
    }

    /// Apply queued audio events and tray input. Returns false once Exit was chosen.
    fn pump(&mut self) -> bool {
        let applied = self.controller.drain_events(&self.events);
        if applied > 0 {
            debug!(applied, "audio events applied");
        }

        for event in self.controller.presenter().indicator().poll_events() {
            match event {
                TrayEvent::DoubleClick => self.hotkeys.toggle(&mut self.controller),
                TrayEvent::Exit => return false,
            }
        }
        true
    }

    fn on_hotkey(&mut self, id: BindingId) {
        if !self.hotkeys.dispatch(id, &mut self.controller) {
            debug!(?id, "hotkey message for unknown binding");
        }
    }

    /// Full teardown: hotkeys, then the device binding, then device
    /// notifications, then the tray icon.
    fn request_exit(mut self) {
        self.hotkeys.unregister_all();
        self.controller.shutdown();
        self.notifications = None;
        self.controller.presenter_mut().indicator_mut().destroy();
        info!("shut down");
    }
}

/// Run the application until the user exits from the tray menu.
pub fn run(config: AppConfig) -> Result<()> {
    let _com = ComGuard::new().context("COM initialization failed")?;

    let mut app = App::start(&config)?;

    let mut msg = MSG::default();
    loop {
        let status = unsafe { GetMessageW(&mut msg, None, 0, 0) };
        match status.0 {
            0 => break,
            -1 => {
                warn!("GetMessageW failed; leaving message loop");
                break;
            }
            _ => {}
        }

        let thread_message = msg.hwnd.0.is_null();
        if thread_message && msg.message == WM_HOTKEY {
            app.on_hotkey(BindingId(msg.wParam.0 as i32));
        } else if !(thread_message && msg.message == WM_AUDIO_EVENT) {
            unsafe {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }

        // Thread messages posted during a modal loop (tray menu) are
        // dropped, so the queue is drained after every message.
        if !app.pump() {
            break;
        }
    }

    app.request_exit();
    Ok(())
}
