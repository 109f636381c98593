//! Visual and audible feedback for mute state publications.
//!
//! [`FeedbackPresenter`] turns each [`StateUpdate`] into one icon and, when
//! the mute state actually changed, one audio cue. The only state it keeps
//! is what the indicator currently shows, so repeated identical updates
//! (volume-only notifications) do not redraw it.

use crate::controller::{Presenter, StateUpdate};
use tracing::debug;

/// Longest tooltip the Windows notification area holds, in UTF-16 units
/// (`szTip` is 128 units including the terminator).
pub const MAX_TOOLTIP_UNITS: usize = 127;

/// Which indicator icon to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    MicOn,
    MicOff,
}

impl IconKind {
    pub fn for_state(muted: bool) -> Self {
        if muted {
            IconKind::MicOff
        } else {
            IconKind::MicOn
        }
    }
}

/// Which audio cue to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Played when the microphone goes live
    SpeechOn,
    /// Played when the microphone is muted
    SpeechOff,
}

impl Cue {
    pub fn for_state(muted: bool) -> Self {
        if muted {
            Cue::SpeechOff
        } else {
            Cue::SpeechOn
        }
    }
}

/// Renders the indicator (tray icon + tooltip).
pub trait Indicator {
    fn show(&mut self, icon: IconKind, tooltip: &str);
}

/// Plays audio cues. Must not block.
pub trait CuePlayer {
    fn play(&mut self, cue: Cue);
}

/// Tooltip text for an update.
pub fn tooltip(update: &StateUpdate) -> String {
    let text = if update.bound && update.muted {
        format!("{} (Muted)", update.label)
    } else {
        update.label.clone()
    };
    let mut units = 0;
    text.chars()
        .take_while(|c| {
            units += c.len_utf16();
            units <= MAX_TOOLTIP_UNITS
        })
        .collect()
}

pub struct FeedbackPresenter<I: Indicator, C: CuePlayer> {
    indicator: I,
    cues: Option<C>,
    shown: Option<(IconKind, String)>,
}

impl<I: Indicator, C: CuePlayer> FeedbackPresenter<I, C> {
    /// `cues` is `None` when audio cues are disabled.
    pub fn new(indicator: I, cues: Option<C>) -> Self {
        Self {
            indicator,
            cues,
            shown: None,
        }
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    pub fn indicator_mut(&mut self) -> &mut I {
        &mut self.indicator
    }
}

impl<I: Indicator, C: CuePlayer> Presenter for FeedbackPresenter<I, C> {
    fn present(&mut self, update: &StateUpdate) {
        let shown = (IconKind::for_state(update.muted), tooltip(update));
        if self.shown.as_ref() != Some(&shown) {
            self.indicator.show(shown.0, &shown.1);
            self.shown = Some(shown);
        }

        if update.mute_changed {
            if let Some(cues) = self.cues.as_mut() {
                let cue = Cue::for_state(update.muted);
                debug!(?cue, "playing cue");
                cues.play(cue);
            }
        }
    }
}
